#![allow(dead_code)]

use bcgmatrix::domain::dataset::{Dataset, ProductId};
use bcgmatrix::domain::error::BcgError;
use bcgmatrix::domain::session::MatrixSession;
use bcgmatrix::ports::dataset_port::DatasetPort;
use bcgmatrix::ports::id_port::IdPort;
use bcgmatrix::ports::listener_port::MetricsListener;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }
}

impl IdPort for SequentialIds {
    fn next_id(&self) -> u64 {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }
}

#[derive(Clone, Default)]
pub struct RecordingListener {
    pub published: Rc<RefCell<Vec<Dataset>>>,
}

impl RecordingListener {
    pub fn count(&self) -> usize {
        self.published.borrow().len()
    }
}

impl MetricsListener for RecordingListener {
    fn metrics_published(&self, dataset: &Dataset) {
        self.published.borrow_mut().push(dataset.clone());
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub payload: RefCell<Option<Value>>,
    pub saves: Cell<usize>,
}

impl MemoryStore {
    pub fn with_payload(payload: Value) -> Self {
        Self {
            payload: RefCell::new(Some(payload)),
            saves: Cell::new(0),
        }
    }
}

impl DatasetPort for MemoryStore {
    fn fetch(&self) -> Result<Option<Value>, BcgError> {
        Ok(self.payload.borrow().clone())
    }

    fn save(&self, payload: &Value) -> Result<(), BcgError> {
        *self.payload.borrow_mut() = Some(payload.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

pub fn new_session() -> (MatrixSession, RecordingListener) {
    let listener = RecordingListener::default();
    let session = MatrixSession::new(Box::new(SequentialIds::starting_at(1_000)))
        .with_listener(Box::new(listener.clone()));
    (session, listener)
}

/// A session with one product per sales figure.
pub fn session_with_sales(sales: &[f64]) -> (MatrixSession, Vec<ProductId>, RecordingListener) {
    let (mut session, listener) = new_session();
    let ids = sales
        .iter()
        .map(|s| {
            let id = session.add_product();
            session.set_product_sales(id, s).unwrap();
            id
        })
        .collect();
    (session, ids, listener)
}

/// Product id sets of the four collections and of every period.
pub fn id_sets(dataset: &Dataset) -> Vec<BTreeSet<ProductId>> {
    let mut sets = vec![
        dataset.sales_forecast.products.iter().map(|p| p.id).collect(),
        dataset
            .competitor_sales
            .products
            .iter()
            .map(|cp| cp.product_id)
            .collect(),
        dataset
            .bcg_table
            .products
            .iter()
            .map(|m| m.product_id)
            .collect(),
    ];
    for period in &dataset.market_growth_rates.periods {
        sets.push(period.product_values.iter().map(|pv| pv.product_id).collect());
    }
    sets
}

pub fn assert_ids_aligned(dataset: &Dataset) {
    let sets = id_sets(dataset);
    for set in &sets[1..] {
        assert_eq!(&sets[0], set);
    }
    dataset.check_integrity().unwrap();
}
