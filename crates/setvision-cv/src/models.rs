//! Model handles owned by the caller and borrowed per analysis

use crate::traits::{Classifier, Detector};

/// The four model capabilities one analysis needs.
///
/// Build it once at startup and pass it by reference to every run; nothing
/// in the pipeline mutates it, so one context can serve several threads.
pub struct ModelContext {
    card_detector: Box<dyn Detector>,
    shape_detector: Box<dyn Detector>,
    fill_classifier: Box<dyn Classifier>,
    shape_classifier: Box<dyn Classifier>,
}

impl ModelContext {
    pub fn new(
        card_detector: impl Detector + 'static,
        shape_detector: impl Detector + 'static,
        fill_classifier: impl Classifier + 'static,
        shape_classifier: impl Classifier + 'static,
    ) -> Self {
        Self {
            card_detector: Box::new(card_detector),
            shape_detector: Box::new(shape_detector),
            fill_classifier: Box::new(fill_classifier),
            shape_classifier: Box::new(shape_classifier),
        }
    }

    /// Finds cards on a whole board
    pub fn card_detector(&self) -> &dyn Detector {
        self.card_detector.as_ref()
    }

    /// Finds symbols on a single card crop
    pub fn shape_detector(&self) -> &dyn Detector {
        self.shape_detector.as_ref()
    }

    /// Classes: empty, full, striped
    pub fn fill_classifier(&self) -> &dyn Classifier {
        self.fill_classifier.as_ref()
    }

    /// Classes: diamond, oval, squiggle
    pub fn shape_classifier(&self) -> &dyn Classifier {
        self.shape_classifier.as_ref()
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext").finish_non_exhaustive()
    }
}
