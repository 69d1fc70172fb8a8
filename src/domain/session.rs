//! Matrix session: the host-facing holder of the current dataset.
//!
//! Each mutation is applied to the current snapshot, the derivation pipeline
//! settles the result, and the listener hears about it only when the gate
//! publishes. A mutation is fully settled before the next one is accepted.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::classification::{classify_all, ClassifiedProduct};
use super::dataset::{Dataset, PeriodId, ProductId};
use super::derivation::settle;
use super::error::BcgError;
use super::gate::Publication;
use super::integrity::{self, Labels};
use super::numeric::ToNumber;
use super::payload::{parse_consistent, to_payload};
use crate::ports::dataset_port::DatasetPort;
use crate::ports::id_port::IdPort;
use crate::ports::listener_port::MetricsListener;

pub struct MatrixSession {
    dataset: Dataset,
    labels: Labels,
    ids: Box<dyn IdPort>,
    listener: Option<Box<dyn MetricsListener>>,
    loaded: bool,
}

impl MatrixSession {
    /// Start from an empty dataset. Until a payload is accepted, that empty
    /// dataset is what a rejected load falls back to.
    pub fn new(ids: Box<dyn IdPort>) -> Self {
        MatrixSession {
            dataset: Dataset::new(),
            labels: Labels::default(),
            ids,
            listener: None,
            loaded: false,
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn MetricsListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Whether any payload has been accepted since the session started.
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn classified(&self) -> Vec<ClassifiedProduct> {
        classify_all(&self.dataset)
    }

    /// Adopt a saved payload. On any error the current dataset is kept as is.
    pub fn load(&mut self, raw: &Value) -> Result<Publication, BcgError> {
        let incoming = match parse_consistent(raw) {
            Ok(ds) => ds,
            Err(e) => {
                warn!(error = %e, "rejected payload, keeping current dataset");
                return Err(e);
            }
        };
        self.loaded = true;
        info!(
            products = incoming.products().len(),
            periods = incoming.periods().len(),
            "loaded dataset"
        );
        Ok(self.commit(incoming))
    }

    /// Load from a store; an empty store leaves the session untouched.
    pub fn load_from(&mut self, store: &dyn DatasetPort) -> Result<Publication, BcgError> {
        match store.fetch()? {
            Some(raw) => self.load(&raw),
            None => {
                debug!("store is empty, starting from current dataset");
                Ok(Publication::NoOp)
            }
        }
    }

    pub fn save(&self) -> Result<Value, BcgError> {
        to_payload(&self.dataset)
    }

    pub fn save_to(&self, store: &dyn DatasetPort) -> Result<(), BcgError> {
        store.save(&self.save()?)
    }

    pub fn add_product(&mut self) -> ProductId {
        let (next, id) = integrity::add_product(&self.dataset, self.ids.as_ref(), &self.labels);
        info!(product = %id, "added product");
        self.commit(next);
        id
    }

    pub fn remove_product(&mut self, id: ProductId) -> Result<Publication, BcgError> {
        let next = integrity::remove_product(&self.dataset, id)?;
        info!(product = %id, "removed product");
        Ok(self.commit(next))
    }

    pub fn add_period(&mut self) -> PeriodId {
        let (next, id) = integrity::add_period(&self.dataset, self.ids.as_ref(), &self.labels);
        info!(period = %id, "added period");
        self.commit(next);
        id
    }

    pub fn remove_period(&mut self, id: PeriodId) -> Result<Publication, BcgError> {
        let next = integrity::remove_period(&self.dataset, id)?;
        info!(period = %id, "removed period");
        Ok(self.commit(next))
    }

    pub fn rename_product(&mut self, id: ProductId, name: &str) -> Result<Publication, BcgError> {
        let next = integrity::rename_product(&self.dataset, id, name)?;
        Ok(self.commit(next))
    }

    pub fn set_product_sales<N: ToNumber + ?Sized>(
        &mut self,
        id: ProductId,
        sales: &N,
    ) -> Result<Publication, BcgError> {
        let next = integrity::set_product_sales(&self.dataset, id, sales)?;
        Ok(self.commit(next))
    }

    pub fn set_period_value<N: ToNumber + ?Sized>(
        &mut self,
        period_id: PeriodId,
        product_id: ProductId,
        value: &N,
    ) -> Result<Publication, BcgError> {
        let next = integrity::set_period_value(&self.dataset, period_id, product_id, value)?;
        Ok(self.commit(next))
    }

    pub fn set_competitor_sales<N: ToNumber + ?Sized>(
        &mut self,
        product_id: ProductId,
        competitor_id: &str,
        sales: &N,
    ) -> Result<Publication, BcgError> {
        let next =
            integrity::set_competitor_sales(&self.dataset, product_id, competitor_id, sales)?;
        Ok(self.commit(next))
    }

    /// Re-run the pipeline on the current dataset without a mutation.
    pub fn refresh(&mut self) -> Publication {
        let current = self.dataset.clone();
        self.commit(current)
    }

    fn commit(&mut self, next: Dataset) -> Publication {
        let (settled, publication) = settle(&next);
        self.dataset = settled;
        debug!(?publication, "derived metrics settled");
        if publication.is_publish() {
            if let Some(listener) = &self.listener {
                listener.metrics_published(&self.dataset);
            }
        }
        publication
    }
}
