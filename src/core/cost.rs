// src/core/cost.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CostConfig;
use super::composition::ConstructComposition;
use super::construct::{push_unique, ConstructCatalog, ConstructDefinition, ConstructLevel};

const HOURS_PER_MONTH: f64 = 30.0 * 24.0;
const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const DEFAULT_REGION: &str = "default";

const ESTIMATE_DISCLAIMER: &str =
    "Estimate only; actual costs vary with real usage and provider pricing changes";
const DATA_TRANSFER_DISCLAIMER: &str = "Excludes data transfer costs";
const L3_DISCLAIMER: &str =
    "L3 constructs aggregate several underlying resources; actual cost depends on the constructs they assemble";
const NO_USAGE_NOTE: &str = "No usage specified; estimate covers base cost only";

/// Region → price multiplier, per provider
const REGION_MULTIPLIERS: &[(&str, &[(&str, f64)])] = &[
    (
        "aws",
        &[
            ("us-east-1", 1.0),
            ("us-east-2", 1.0),
            ("us-west-1", 1.08),
            ("us-west-2", 1.0),
            ("eu-west-1", 1.1),
            ("eu-central-1", 1.12),
            ("ap-southeast-1", 1.15),
            ("ap-northeast-1", 1.18),
            ("sa-east-1", 1.35),
        ],
    ),
    (
        "gcp",
        &[
            ("us-central1", 1.0),
            ("us-east1", 1.0),
            ("europe-west1", 1.1),
            ("asia-east1", 1.15),
        ],
    ),
    (
        "azure",
        &[
            ("eastus", 1.0),
            ("westus", 1.05),
            ("westeurope", 1.12),
            ("southeastasia", 1.15),
        ],
    ),
    ("firebase", &[("us-central1", 1.0), ("europe-west1", 1.1)]),
];

/// Expected monthly usage; absent dimensions are not billed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageAssumptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub item: String,
    pub cost: f64,
    pub unit: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub hourly: f64,
    pub daily: f64,
    pub monthly: f64,
    pub yearly: f64,
}

impl CostTotals {
    pub fn from_monthly(monthly: f64) -> Self {
        Self {
            hourly: monthly / HOURS_PER_MONTH,
            daily: monthly / DAYS_PER_MONTH,
            monthly,
            yearly: monthly * MONTHS_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub provider: String,
    pub region: String,
    pub currency: String,
    pub breakdown: Vec<CostLineItem>,
    pub total: CostTotals,
    pub assumptions: Vec<String>,
}

/// Multiplier for `region` under `provider`; unknown pairs price at 1
pub fn region_multiplier(provider: &str, region: Option<&str>) -> f64 {
    let Some(region) = region else {
        return 1.0;
    };

    REGION_MULTIPLIERS
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(provider))
        .and_then(|(_, regions)| regions.iter().find(|(r, _)| *r == region))
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Estimates running cost from static per-unit pricing
pub struct CostCalculator {
    config: CostConfig,
}

impl CostCalculator {
    pub fn new() -> Self {
        Self::with_config(CostConfig::default())
    }

    pub fn with_config(config: CostConfig) -> Self {
        Self { config }
    }

    pub fn estimate_construct(
        &self,
        definition: &ConstructDefinition,
        provider: &str,
        region: Option<&str>,
        usage: Option<&UsageAssumptions>,
    ) -> CostEstimate {
        let region_name = region.unwrap_or(DEFAULT_REGION).to_string();

        let Some(model) = definition.cost_model(provider) else {
            debug!("No cost model for '{}' on provider '{}'", definition.id, provider);
            return CostEstimate {
                provider: provider.to_string(),
                region: region_name,
                currency: "USD".to_string(),
                breakdown: Vec::new(),
                total: CostTotals::default(),
                assumptions: vec![format!(
                    "No cost model available for construct '{}' on provider '{}'",
                    definition.id, provider
                )],
            };
        };

        let mut breakdown = Vec::new();
        let mut monthly = model.base_cost;

        if model.base_cost != 0.0 {
            breakdown.push(CostLineItem {
                item: "Base cost".to_string(),
                cost: model.base_cost,
                unit: "month".to_string(),
                quantity: 1.0,
            });
        }

        if let Some(usage) = usage {
            let pricing = &model.usage_pricing;
            let dimensions = [
                ("Requests", "requests", usage.requests, pricing.requests),
                ("Storage", "GB", usage.storage_gb, pricing.storage),
                ("Compute", "hours", usage.compute_hours, pricing.compute),
            ];

            for (label, unit, quantity, unit_price) in dimensions {
                if let (Some(quantity), Some(unit_price)) = (quantity, unit_price) {
                    let cost = quantity * unit_price;
                    breakdown.push(CostLineItem {
                        item: label.to_string(),
                        cost,
                        unit: unit.to_string(),
                        quantity,
                    });
                    monthly += cost;
                }
            }
        }

        let multiplier = region_multiplier(provider, region);
        monthly *= multiplier;

        let mut assumptions = Vec::new();
        match usage {
            None => assumptions.push(NO_USAGE_NOTE.to_string()),
            Some(usage) => {
                if let Some(requests) = usage.requests {
                    assumptions.push(format!("Assuming {} requests per month", requests));
                }
                if let Some(storage) = usage.storage_gb {
                    assumptions.push(format!("Assuming {} GB of storage", storage));
                }
                if let Some(hours) = usage.compute_hours {
                    assumptions.push(format!("Assuming {} compute hours per month", hours));
                }
            }
        }
        if multiplier != 1.0 {
            assumptions.push(format!(
                "Region '{}' prices at {}x the base rate",
                region_name, multiplier
            ));
        }
        assumptions.push(ESTIMATE_DISCLAIMER.to_string());
        assumptions.push(DATA_TRANSFER_DISCLAIMER.to_string());
        if definition.level == ConstructLevel::L3 {
            assumptions.push(L3_DISCLAIMER.to_string());
        }

        CostEstimate {
            provider: provider.to_string(),
            region: region_name,
            currency: model.currency.clone(),
            breakdown,
            total: CostTotals::from_monthly(monthly),
            assumptions,
        }
    }

    /// Sum per-instance estimates, then apply overhead and the size discount
    ///
    /// Instances whose construct is missing from `catalog` are skipped.
    pub fn estimate_composition(
        &self,
        composition: &ConstructComposition,
        provider: &str,
        region: Option<&str>,
        usage: Option<&UsageAssumptions>,
        catalog: &ConstructCatalog,
    ) -> CostEstimate {
        let mut breakdown = Vec::new();
        let mut assumptions: Vec<String> = Vec::new();
        let mut monthly = 0.0;

        for instance in &composition.instances {
            let Some(definition) = catalog.get(&instance.construct_id) else {
                debug!(
                    "Skipping instance '{}': construct '{}' not in catalog",
                    instance.instance_name, instance.construct_id
                );
                continue;
            };

            let estimate = self.estimate_construct(definition, provider, region, usage);
            breakdown.extend(estimate.breakdown.into_iter().map(|line| CostLineItem {
                item: format!("{}: {}", instance.instance_name, line.item),
                ..line
            }));
            monthly += estimate.total.monthly;

            for assumption in estimate.assumptions {
                push_unique(&mut assumptions, assumption);
            }
        }

        let overhead = monthly * self.config.management_overhead_rate;
        breakdown.push(CostLineItem {
            item: format!(
                "Management overhead ({}%)",
                percent(self.config.management_overhead_rate)
            ),
            cost: overhead,
            unit: "month".to_string(),
            quantity: 1.0,
        });
        monthly += overhead;

        if composition.instances.len() > self.config.efficiency_discount_threshold {
            let discount = monthly * self.config.efficiency_discount_rate;
            breakdown.push(CostLineItem {
                item: format!(
                    "Multi-construct efficiency discount (-{}%)",
                    percent(self.config.efficiency_discount_rate)
                ),
                cost: -discount,
                unit: "month".to_string(),
                quantity: 1.0,
            });
            monthly -= discount;
            push_unique(
                &mut assumptions,
                format!(
                    "{}% efficiency discount applied for compositions with more than {} constructs",
                    percent(self.config.efficiency_discount_rate),
                    self.config.efficiency_discount_threshold
                ),
            );
        }

        debug!(
            "Estimated composition '{}' at {:.2}/month on {}",
            composition.name, monthly, provider
        );

        CostEstimate {
            provider: provider.to_string(),
            region: region.unwrap_or(DEFAULT_REGION).to_string(),
            currency: "USD".to_string(),
            breakdown,
            total: CostTotals::from_monthly(monthly),
            assumptions,
        }
    }
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(rate: f64) -> String {
    format!("{}", (rate * 100.0).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_multiplier_lookup() {
        assert_eq!(region_multiplier("aws", Some("eu-west-1")), 1.1);
        assert_eq!(region_multiplier("AWS", Some("sa-east-1")), 1.35);
        assert_eq!(region_multiplier("aws", Some("mars-north-1")), 1.0);
        assert_eq!(region_multiplier("digitalocean", Some("nyc1")), 1.0);
        assert_eq!(region_multiplier("gcp", None), 1.0);
    }

    #[test]
    fn test_totals_from_monthly() {
        let totals = CostTotals::from_monthly(720.0);
        assert_eq!(totals.hourly, 1.0);
        assert_eq!(totals.daily, 24.0);
        assert_eq!(totals.yearly, 8640.0);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent(0.10), "10");
        assert_eq!(percent(0.05), "5");
    }
}
