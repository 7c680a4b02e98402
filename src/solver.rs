//! Card-list solving for the command line

use anyhow::{Context, Result};
use log::info;
use setvision_core::{BoardState, SetFinder, SetSearch};
use setvision_cv::detection::{AnalysisStats, PipelineConfig, SetReport};
use setvision_cv::{ImageUtils, ResultRenderer};
use std::path::Path;
use std::time::Instant;

/// Cards plus the outcome of searching them
pub struct Solved {
    pub board: BoardState,
    pub search: SetSearch,
    pub elapsed_ms: u64,
}

impl Solved {
    pub fn report(&self) -> SetReport {
        let stats = AnalysisStats {
            cards_detected: self.board.len(),
            unknown_cards: self.board.unknown_count(),
            combinations_checked: self.search.combinations_checked,
            sets_found: self.search.sets.len(),
            processing_time_ms: self.elapsed_ms,
        };
        SetReport::new(self.search.sets.clone(), stats)
    }
}

/// Load a JSON card list and find every SET in it
pub fn solve_cards(cards_path: &Path) -> Result<Solved> {
    let started = Instant::now();
    let board = BoardState::load(cards_path)?;
    let search = SetFinder::new().search(&board);

    info!(
        "{} cards loaded, {} playable, {} SET(s)",
        board.len(),
        board.len() - board.unknown_count(),
        search.sets.len()
    );

    Ok(Solved {
        board,
        search,
        elapsed_ms: AnalysisStats::millis(started.elapsed()),
    })
}

/// Draw the SETs onto the board photo and save the result
pub fn annotate(solved: &Solved, image_path: &Path, output_path: &Path, config: &PipelineConfig) -> Result<()> {
    let image = ImageUtils::load_rgb(image_path)?;
    let renderer = ResultRenderer::new(&config.render);
    let annotated = renderer.render(&image, &solved.search.sets);
    ImageUtils::save_image(&annotated, output_path)
        .with_context(|| format!("Failed to write annotated board for {:?}", image_path))?;

    info!("annotated board saved: {:?}", output_path);
    Ok(())
}
