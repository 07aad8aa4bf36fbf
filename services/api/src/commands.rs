use crate::infra::lead_factory;
use clap::Args;
use showroom_leads::config::AppConfig;
use showroom_leads::error::AppError;
use showroom_leads::telemetry;
use showroom_leads::workflows::leads::validation::LEAD_KEYS;
use showroom_leads::workflows::leads::{require_keys, user_from_payload};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct LeadCreateArgs {
    /// JSON file holding the lead payload (`user`, `event`, `showroom`, optional `info`)
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// Submit the payload this many times to show twin detection
    #[arg(long, default_value_t = 1)]
    pub(crate) repeat: u32,
}

pub(crate) fn run_lead_create(args: LeadCreateArgs) -> Result<(), AppError> {
    let LeadCreateArgs { payload, repeat } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = std::fs::read_to_string(&payload)?;
    let payload: serde_json::Value = serde_json::from_str(&raw)?;
    require_keys(&payload, LEAD_KEYS)?;
    let user = user_from_payload(&payload["user"])?;

    let (factory, showroom_count) = lead_factory(&config.leads)?;
    println!("Showroom catalog: {showroom_count} showrooms");

    for attempt in 1..=repeat.max(1) {
        let submission = factory.submit(&user, &payload)?;
        println!(
            "Submission {attempt}: {}",
            if submission.is_created() {
                "stored new lead"
            } else {
                "returned existing twin"
            }
        );
        println!("{}", serde_json::to_string_pretty(&submission.lead().view())?);
    }

    Ok(())
}
