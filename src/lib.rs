// src/lib.rs

use std::sync::Arc;

use services::browse::BrowseService;
use services::ens::EnsNameService;
use services::indexer::IndexerService;
use services::rental_contract::RentalContractService;

#[derive(Clone)]
pub struct AppState {
    pub indexer: IndexerService,
    pub ens: EnsNameService,
    pub contract: Arc<RentalContractService>,
    pub browse: Arc<BrowseService>,
}

pub mod services {
    pub mod browse;
    pub mod ens;
    pub mod indexer;
    pub mod pagination;
    pub mod pricing;
    pub mod rental_contract;
    pub mod resolver;
}

pub mod config;
pub mod handlers;
pub mod models;
