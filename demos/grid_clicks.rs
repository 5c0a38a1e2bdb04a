//! Dry run of a numbered-grid clicking session
//!
//! Lays out a handful of numbered cells, clicks them in ascending order with
//! human-like motion, then presses a "continue" button. The recorded pointer
//! events are written to `grid-clicks.json` (or the path given as the second
//! argument). An optional first argument names a JSON motion config.
//!
//! ```text
//! cargo run --example grid_clicks -- motion.json capture.json
//! ```

use anyhow::Context;
use async_trait::async_trait;
use human_cursor::{
    BoundingBox, ClickOptions, ElementBoundsProvider, HumanPointer, MotionConfig, MoveOptions,
    PerturbationMode, Position, RecordingActuator, StepSizing, TimingStrategy,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Element {
    Cell(u32),
    Continue,
}

struct FakePage {
    boxes: HashMap<Element, BoundingBox>,
}

impl FakePage {
    fn new(cells: &[(u32, usize, usize)]) -> Self {
        let mut boxes = HashMap::new();
        for &(number, col, row) in cells {
            boxes.insert(
                Element::Cell(number),
                BoundingBox::new(
                    240.0 + col as f64 * 90.0,
                    120.0 + row as f64 * 90.0,
                    80.0,
                    80.0,
                ),
            );
        }
        boxes.insert(Element::Continue, BoundingBox::new(560.0, 620.0, 160.0, 48.0));
        Self { boxes }
    }

    fn numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .boxes
            .keys()
            .filter_map(|e| match e {
                Element::Cell(n) => Some(*n),
                Element::Continue => None,
            })
            .collect();
        numbers.sort_unstable();
        numbers
    }
}

#[async_trait]
impl ElementBoundsProvider for FakePage {
    type Element = Element;

    async fn bounding_box(&self, element: &Element) -> Option<BoundingBox> {
        self.boxes.get(element).copied()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    human_cursor::init_tracing("human_cursor=debug,grid_clicks=info");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MotionConfig::load(Path::new(&path))
            .with_context(|| format!("loading motion config from {}", path))?,
        None => MotionConfig::default(),
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("grid-clicks.json"));

    let recorder = RecordingActuator::new();
    let pointer = HumanPointer::new(recorder.clone(), config)?;
    pointer.initialize(Position::new(0.0, 0.0)).await?;

    let page = FakePage::new(&[(3, 0, 2), (1, 4, 0), (5, 2, 3), (2, 1, 1), (4, 5, 4)]);
    let options = ClickOptions::default();

    for number in page.numbers() {
        pointer
            .click_element(&page, &Element::Cell(number), &options)
            .await
            .with_context(|| format!("clicking cell {}", number))?;
        tracing::info!("Clicked cell {}", number);
    }

    // Fast, loopy approach to the button with a slightly sloppy press
    let brisk = MoveOptions::default()
        .with_timing(TimingStrategy::TimeBudgeted)
        .with_step_sizing(StepSizing::Density)
        .with_step_density(6.0)
        .with_base_speed(300.0)
        .with_acceleration(0.5)
        .with_perturbation(PerturbationMode::Fixed)
        .with_curve_intensity(200.0);
    let continue_options = options.clone().with_motion(brisk).with_click_variance(4.0);
    pointer
        .click_element(&page, &Element::Continue, &continue_options)
        .await
        .context("clicking continue")?;

    recorder.save_json(&output)?;
    tracing::info!(
        "Wrote {} pointer events to {}",
        recorder.events().len(),
        output.display()
    );

    Ok(())
}
