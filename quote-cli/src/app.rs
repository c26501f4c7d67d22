//! Wiring and text output for the `motor-quote` commands.

use std::fmt;

use quote_core::calculations::{PremiumResult, ProgressSnapshot};
use quote_core::store::{KeyValueStore, StoreConfig, StoreError, StoreRegistry};
use quote_core::{CoverageOption, QuoteInputs};
use quote_store_file::TomlStoreFactory;
use rust_decimal::Decimal;

/// Registry with every backend the CLI can open.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::with_memory();
    registry.register(Box::new(TomlStoreFactory));
    registry
}

/// Opens the store named by `backend` at `location`.
pub fn open_store(
    backend: &str,
    location: &str,
) -> Result<Box<dyn KeyValueStore>, StoreError> {
    let config = StoreConfig {
        backend: backend.to_string(),
        location: location.to_string(),
    };
    build_registry().create(&config)
}

/// Formats an amount with thousands separators, e.g. `22,500`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_cli::app::format_amount;
///
/// assert_eq!(format_amount(dec!(22500)), "22,500");
/// assert_eq!(format_amount(dec!(-1234.5)), "-1,234.5");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let text = amount.normalize().abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = fraction {
        grouped.push('.');
        grouped.push_str(f);
    }
    if amount.is_sign_negative() && !amount.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

/// Stage-by-stage breakdown of one premium calculation.
pub struct PremiumReport<'a> {
    pub inputs: &'a QuoteInputs,
    pub result: &'a PremiumResult,
}

impl fmt::Display for PremiumReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let vehicle = self
            .inputs
            .vehicle_type
            .as_ref()
            .map_or("(not specified)", |v| v.label());
        let coverages = if self.inputs.has_selection() {
            self.inputs
                .selected_coverages
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "(none)".to_string()
        };

        writeln!(f, "Vehicle:            {vehicle}")?;
        writeln!(f, "Coverages:          {coverages}")?;
        writeln!(f, "Excess amount:      {}", format_amount(self.inputs.excess_amount.into()))?;
        writeln!(
            f,
            "Policy period:      {} ({} off)",
            self.inputs.policy_period.label(),
            self.inputs.policy_period.discount_badge()
        )?;
        writeln!(f, "Vehicle multiplier: {}", self.result.vehicle_multiplier.normalize())?;
        writeln!(f, "Coverage total:     {}", format_amount(self.result.coverage_total))?;
        writeln!(f, "Excess adjustment:  {}", format_amount(self.result.excess_discount))?;
        writeln!(f, "After excess:       {}", format_amount(self.result.discounted_total))?;
        writeln!(f, "Period multiplier:  {}", self.result.period_multiplier.normalize())?;
        if !self.result.unmatched_coverages.is_empty() {
            writeln!(
                f,
                "Ignored coverages:  {}",
                self.result.unmatched_coverages.join(", ")
            )?;
        }
        write!(f, "Premium:            {}", format_amount(self.result.premium))
    }
}

/// One line per coverage package, recommended ones marked with `*`.
pub struct CatalogReport<'a>(pub &'a [CoverageOption]);

impl fmt::Display for CatalogReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let mark = if option.recommended { "*" } else { " " };
            writeln!(
                f,
                "{mark} {:<22} {:>6}  {}",
                option.id,
                format_amount(option.base_premium),
                option.name
            )?;
            writeln!(f, "    {}", option.description)?;
            for feature in &option.features {
                writeln!(f, "    - {feature}")?;
            }
        }
        Ok(())
    }
}

/// Progress bar plus per-step lines.
pub struct ProgressReport<'a>(pub &'a ProgressSnapshot);

impl ProgressReport<'_> {
    const BAR_WIDTH: usize = 20;
}

impl fmt::Display for ProgressReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let overall = usize::from(self.0.overall);
        let filled = overall * Self::BAR_WIDTH / 100;
        writeln!(
            f,
            "[{}{}] {overall}%",
            "#".repeat(filled),
            "-".repeat(Self::BAR_WIDTH - filled)
        )?;
        for (i, step) in self.0.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "  {:<18} {:>3}%  {}",
                step.step.label(),
                step.progress,
                step.status
            )?;
        }
        Ok(())
    }
}
