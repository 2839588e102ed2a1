//! Section bindings: which tokens live in which section, and where their
//! values come from in the snapshot
//!
//! The section set is data, not hard-coded renderer knowledge: the renderer
//! walks whatever bindings it is given. `standard()` is the binding table
//! for the stock weekly-report template.

use super::format::ValueFormat;

/// One token inside a section: marker string, snapshot path, render format
#[derive(Debug, Clone)]
pub struct TokenBinding {
    pub token: String,
    pub path: String,
    pub format: ValueFormat,
}

/// A named template section and its tokens
#[derive(Debug, Clone)]
pub struct SectionBinding {
    pub section: String,
    pub tokens: Vec<TokenBinding>,
}

/// The full binding table the renderer applies per run
#[derive(Debug, Clone)]
pub struct SectionBindings {
    pub sections: Vec<SectionBinding>,
}

fn token(token: &str, path: &str, format: ValueFormat) -> TokenBinding {
    TokenBinding {
        token: token.to_string(),
        path: path.to_string(),
        format,
    }
}

impl SectionBindings {
    /// Binding table for the stock weekly-report template
    pub fn standard() -> Self {
        let title = SectionBinding {
            section: "title".to_string(),
            tokens: vec![
                token("{{REPORT_WEEK}}", "metadata.week", ValueFormat::Text),
                token("{{GENERATED_AT}}", "metadata.generated_at", ValueFormat::Text),
            ],
        };

        let financial = SectionBinding {
            section: "financial_overview".to_string(),
            tokens: vec![
                token(
                    "{{TOTAL_RECEIVABLES}}",
                    "tckt.overview.receivables.total",
                    ValueFormat::Integer,
                ),
                token(
                    "{{RECEIVABLES_WITHIN_TERM}}",
                    "tckt.overview.receivables.within_term",
                    ValueFormat::Integer,
                ),
                token(
                    "{{RECEIVABLES_OVERDUE}}",
                    "tckt.overview.receivables.overdue",
                    ValueFormat::Integer,
                ),
                token(
                    "{{TOTAL_PAYABLES}}",
                    "tckt.overview.payables.total",
                    ValueFormat::Integer,
                ),
                token(
                    "{{PAYABLES_WITHIN_TERM}}",
                    "tckt.overview.payables.within_term",
                    ValueFormat::Integer,
                ),
                token(
                    "{{PAYABLES_OVERDUE}}",
                    "tckt.overview.payables.overdue",
                    ValueFormat::Integer,
                ),
                token(
                    "{{CASH_FLOW_CURRENT}}",
                    "tckt.overview.cash_flow.current_month",
                    ValueFormat::Currency,
                ),
                token(
                    "{{CASH_FLOW_PREVIOUS}}",
                    "tckt.overview.cash_flow.previous_month",
                    ValueFormat::Currency,
                ),
                token(
                    "{{PAYMENT_CHANGES}}",
                    "tckt.explanations.payment_changes",
                    ValueFormat::JoinedList,
                ),
                token(
                    "{{REVENUE_CHANGES}}",
                    "tckt.explanations.revenue_changes",
                    ValueFormat::JoinedList,
                ),
            ],
        };

        let schedule = SectionBinding {
            section: "ship_schedule".to_string(),
            tokens: (0..3)
                .flat_map(|i| {
                    let n = i + 1;
                    vec![
                        token(
                            &format!("{{{{SHIP_{n}_NAME}}}}"),
                            &format!("ops.ship_schedule.{i}.ship_name"),
                            ValueFormat::Text,
                        ),
                        token(
                            &format!("{{{{SHIP_{n}_VOYAGE}}}}"),
                            &format!("ops.ship_schedule.{i}.voyage"),
                            ValueFormat::Text,
                        ),
                        token(
                            &format!("{{{{SHIP_{n}_ROUTE}}}}"),
                            &format!("ops.ship_schedule.{i}.route"),
                            ValueFormat::Text,
                        ),
                        token(
                            &format!("{{{{SHIP_{n}_POSITION}}}}"),
                            &format!("ops.ship_schedule.{i}.position"),
                            ValueFormat::Text,
                        ),
                        token(
                            &format!("{{{{SHIP_{n}_STATUS}}}}"),
                            &format!("ops.ship_schedule.{i}.status"),
                            ValueFormat::Text,
                        ),
                    ]
                })
                .chain(std::iter::once(token(
                    "{{SHIP_COUNT}}",
                    "ops.ship_schedule",
                    ValueFormat::Count,
                )))
                .collect(),
        };

        let market = SectionBinding {
            section: "market_overview".to_string(),
            tokens: vec![
                token(
                    "{{HPH_HCM_SHARE}}",
                    "kinh_doanh.market_overview.hph_hcm_route.vlines_share",
                    ValueFormat::Percent { precision: 1 },
                ),
                token(
                    "{{HCM_HPH_SHARE}}",
                    "kinh_doanh.market_overview.hcm_hph_route.vlines_share",
                    ValueFormat::Percent { precision: 1 },
                ),
                token(
                    "{{TOP_CUSTOMERS_HPH_HCM}}",
                    "kinh_doanh.top_customers.hph_hcm",
                    ValueFormat::JoinedList,
                ),
                token(
                    "{{TOP_CUSTOMERS_HCM_HPH}}",
                    "kinh_doanh.top_customers.hcm_hph",
                    ValueFormat::JoinedList,
                ),
                token(
                    "{{MARKET_NOTES}}",
                    "kinh_doanh.market_notes",
                    ValueFormat::JoinedList,
                ),
            ],
        };

        SectionBindings {
            sections: vec![title, financial, schedule, market],
        }
    }
}

impl Default for SectionBindings {
    fn default() -> Self {
        Self::standard()
    }
}
