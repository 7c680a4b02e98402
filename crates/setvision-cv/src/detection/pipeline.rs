//! High-level SET detection pipeline

use super::config::PipelineConfig;
use super::outcome::{AnalysisStats, DetectionOutcome};
use crate::deadline::Deadline;
use crate::error::Result;
use crate::features::CardFeatureExtractor;
use crate::models::ModelContext;
use crate::orientation::OrientationCorrector;
use crate::render::ResultRenderer;
use crate::segment::CardSegmenter;
use crate::utils::ImageUtils;
use image::RgbImage;
use log::{debug, info};
use setvision_core::{BoardState, CardFeatures, SetCandidate, SetFinder};

/// Builds the board state of one (already oriented) board image
pub struct BoardAnalyzer<'a> {
    segmenter: CardSegmenter<'a>,
    extractor: CardFeatureExtractor<'a>,
}

impl<'a> BoardAnalyzer<'a> {
    pub fn new(models: &'a ModelContext, config: &PipelineConfig) -> Self {
        Self {
            segmenter: CardSegmenter::new(models.card_detector(), config.min_detection_confidence),
            extractor: CardFeatureExtractor::new(models, config),
        }
    }

    pub fn with_deadline(self, deadline: Deadline) -> Self {
        Self {
            segmenter: self.segmenter.with_deadline(deadline),
            extractor: self.extractor.with_deadline(deadline),
        }
    }

    /// Detect every card and resolve its features, in detection order
    pub fn analyze(&self, board_image: &RgbImage) -> Result<BoardState> {
        let regions = self.segmenter.segment(board_image)?;

        let mut cards = Vec::with_capacity(regions.len());
        for region in &regions {
            cards.push(self.extractor.extract(&region.crop, region.bbox)?);
        }
        Ok(BoardState::new(cards))
    }
}

/// Entry point: photo in, SETs and annotated photo out
#[derive(Debug, Clone)]
pub struct SetPipeline {
    config: PipelineConfig,
    corrector: OrientationCorrector,
    finder: SetFinder,
    renderer: ResultRenderer,
}

impl SetPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let renderer = ResultRenderer::new(&config.render);
        Self {
            config,
            corrector: OrientationCorrector::new(),
            finder: SetFinder::new(),
            renderer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyse one decoded board image
    pub fn run(&self, models: &ModelContext, image: &RgbImage) -> Result<DetectionOutcome> {
        ImageUtils::ensure_not_empty(image)?;
        let deadline = Deadline::start(self.config.timeout());
        debug!("analysing {}x{} board", image.width(), image.height());

        let card_boxes = CardSegmenter::new(models.card_detector(), self.config.min_detection_confidence)
            .with_deadline(deadline)
            .detect_boxes(image)?;
        let (processed, was_rotated) = self.corrector.correct(image, &card_boxes);

        let board = BoardAnalyzer::new(models, &self.config)
            .with_deadline(deadline)
            .analyze(&processed)?;
        let search = self.finder.search(&board);

        let annotated = self.renderer.render(&processed, &search.sets);
        let output = self.corrector.restore(annotated, was_rotated);

        let processed_width = processed.width();
        let restore = |card: CardFeatures| {
            card.with_bbox(self.corrector.restore_box(card.bbox, was_rotated, processed_width))
        };
        let sets: Vec<SetCandidate> = search
            .sets
            .into_iter()
            .map(|set| SetCandidate {
                card_indices: set.card_indices,
                cards: set.cards.map(&restore),
            })
            .collect();
        let stats = AnalysisStats {
            cards_detected: board.len(),
            unknown_cards: board.unknown_count(),
            combinations_checked: search.combinations_checked,
            sets_found: sets.len(),
            processing_time_ms: AnalysisStats::millis(deadline.elapsed()),
        };
        let board: BoardState = board.iter().map(|card| restore(*card)).collect();

        info!(
            "found {} SET(s) among {} cards ({} unresolved) in {} ms",
            stats.sets_found, stats.cards_detected, stats.unknown_cards, stats.processing_time_ms
        );

        Ok(DetectionOutcome {
            board,
            sets,
            image: output,
            was_rotated,
            stats,
        })
    }

    /// Decode an encoded image (PNG, JPEG, ...) and analyse it
    pub fn run_encoded(&self, models: &ModelContext, bytes: &[u8]) -> Result<DetectionOutcome> {
        let image = ImageUtils::decode(bytes)?;
        self.run(models, &image)
    }

    /// Analyse independent boards; results follow input order
    pub fn run_batch(&self, models: &ModelContext, images: &[RgbImage]) -> Vec<Result<DetectionOutcome>> {
        #[cfg(feature = "parallel")]
        let outcomes = {
            use rayon::prelude::*;
            images
                .par_iter()
                .map(|image| self.run(models, image))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes = images.iter().map(|image| self.run(models, image)).collect();

        outcomes
    }
}

impl Default for SetPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
