use anyhow::Result;
use onyx_ext_core::QualityTier;
use serde::Serialize;

#[derive(Serialize)]
struct Rate {
    tier: QualityTier,
    label: &'static str,
    rate_percent: u64,
}

pub(crate) fn run(json: bool) -> Result<()> {
    let rates: Vec<Rate> = QualityTier::ALL
        .iter()
        .map(|t| Rate { tier: *t, label: t.label(), rate_percent: t.rate_percent() })
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
    } else {
        for rate in &rates {
            println!("{:<12} {:>4}%", rate.label, rate.rate_percent);
        }
    }
    Ok(())
}
