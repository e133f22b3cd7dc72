//! What-if scenario simulation
//!
//! Re-runs the analysis pipeline under per-scenario config clones. Shared
//! state is never mutated; every override lands in the clone.

use rust_decimal::prelude::*;

use crate::analysis::engine::AnalysisEngine;
use crate::types::{OpportunityInput, RiskLevel, Scenario, ScenarioOutcome, ScenarioReport};

impl AnalysisEngine {
    pub async fn simulate_scenarios(
        &self,
        input: &OpportunityInput,
        trade_amount: Decimal,
        scenarios: &[Scenario],
    ) -> ScenarioReport {
        let mut outcomes = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            let mut config = self.config().clone();
            if let Some(multiplier) = scenario.gas_multiplier {
                config.gas_cost_multiplier = multiplier;
            }
            if let Some(slippage) = scenario.slippage_override {
                config.max_slippage = slippage;
            }
            if let Some(spread) = scenario.min_spread_override {
                config.min_spread_pct = spread;
            }
            if let Some(volatility) = scenario.volatility_override {
                config.default_volatility = volatility;
            }
            let amount = trade_amount * scenario.amount_factor.unwrap_or(Decimal::ONE);

            match self
                .analyze_with_config(input, amount, None, &config)
                .await
            {
                Ok(report) => outcomes.push(ScenarioOutcome {
                    name: scenario.name.clone(),
                    trade_amount: amount,
                    net_profit: report.profit.net_profit,
                    composite_score: report.assessment.composite_score,
                    executable: report.assessment.executable,
                    risk_level: report.risk.level,
                    error: None,
                }),
                Err(e) => outcomes.push(ScenarioOutcome {
                    name: scenario.name.clone(),
                    trade_amount: amount,
                    net_profit: Decimal::ZERO,
                    composite_score: Decimal::ZERO,
                    executable: false,
                    risk_level: RiskLevel::Critical,
                    error: Some(e.to_string()),
                }),
            }
        }

        let best_scenario = outcomes
            .iter()
            .filter(|o| o.executable)
            .max_by(|a, b| a.composite_score.cmp(&b.composite_score))
            .or_else(|| {
                outcomes
                    .iter()
                    .filter(|o| o.error.is_none())
                    .max_by(|a, b| a.composite_score.cmp(&b.composite_score))
            })
            .map(|o| o.name.clone());

        let executable_count = outcomes.iter().filter(|o| o.executable).count();
        let mut risk_notes = vec![format!(
            "{} of {} scenarios executable",
            executable_count,
            outcomes.len()
        )];
        if outcomes
            .iter()
            .any(|o| matches!(o.risk_level, RiskLevel::High | RiskLevel::Critical))
        {
            risk_notes.push("at least one scenario lands in HIGH/CRITICAL risk".to_string());
        }
        if let Some(best) = &best_scenario {
            risk_notes.push(format!("most favorable parameter set: {best}"));
        }

        ScenarioReport {
            outcomes,
            best_scenario,
            risk_notes,
        }
    }
}
