use crate::adapters::yurplan::YurplanClient;
use crate::badge::{self, template::BadgeTemplate};
use crate::core::{BadgeRecord, Pipeline, RenderedBadge, Storage};
use crate::domain::model::{Corrections, Exceptions, TypeIds};
use crate::utils::error::{BadgerError, Result};
use std::collections::HashSet;

/// Classification inputs for one run. Callers always pass explicit maps,
/// possibly empty.
#[derive(Debug, Clone)]
pub struct BadgeRules {
    pub type_ids: TypeIds,
    pub exceptions: Exceptions,
    pub corrections: Corrections,
}

pub struct BadgePipeline<S: Storage> {
    client: YurplanClient,
    storage: S,
    template: BadgeTemplate,
    rules: BadgeRules,
    output_path: String,
}

impl<S: Storage> BadgePipeline<S> {
    pub fn new(
        client: YurplanClient,
        storage: S,
        template: BadgeTemplate,
        rules: BadgeRules,
        output_path: String,
    ) -> Self {
        Self {
            client,
            storage,
            template,
            rules,
            output_path,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for BadgePipeline<S> {
    async fn extract(&mut self) -> Result<Vec<BadgeRecord>> {
        if !self.client.is_authenticated() {
            self.client.authenticate().await?;
        }

        self.client
            .get_badge_info(
                &self.rules.type_ids,
                &self.rules.exceptions,
                &self.rules.corrections,
            )
            .await
    }

    async fn transform(&self, records: Vec<BadgeRecord>) -> Result<Vec<RenderedBadge>> {
        records
            .into_iter()
            .map(|record| {
                tracing::debug!(
                    "Rendering {} badge for token {}",
                    record.badge_type,
                    record.token
                );
                badge::render_badge(&self.template, record)
            })
            .collect()
    }

    async fn load(&self, badges: Vec<RenderedBadge>) -> Result<String> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.badge_file.as_str()) {
                return Err(BadgerError::ProcessingError {
                    message: format!(
                        "two badges would be written to {} (token {})",
                        badge.badge_file, badge.record.token
                    ),
                });
            }
        }

        for badge in &badges {
            self.storage
                .write_file(&badge.barcode_file, &badge.barcode_png)
                .await?;
            self.storage
                .write_file(&badge.badge_file, badge.badge_svg.as_bytes())
                .await?;
        }

        tracing::debug!("Wrote {} files", badges.len() * 2);
        Ok(self.output_path.clone())
    }
}
