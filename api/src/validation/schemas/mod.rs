//! Per-entity schema tables

mod activity;
mod faq;
mod friend;
mod plan;
mod post;
mod public;

use super::schema::OperationSchema;

/// Every schema the API declares
pub fn all() -> Vec<OperationSchema> {
    [
        activity::schemas(),
        friend::schemas(),
        plan::schemas(),
        post::schemas(),
        public::schemas(),
        faq::schemas(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
