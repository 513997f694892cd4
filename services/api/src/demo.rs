use crate::infra::{InMemoryAgentNotifier, InMemoryDialer, InMemoryLeadRepository};
use clap::Args;
use leadqual::config::DialerSettings;
use leadqual::error::AppError;
use leadqual::workflows::qualification::{
    extract_summary, score, CallWebhook, CallWebhookStatus, ContactInfo, LeadQualificationService,
    LeadSubmission, QualificationForm, QualificationServiceError, WebhookMetadata,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// What the lead wants to do: buy, sell, both, rent, just_looking
    #[arg(long)]
    intent: String,
    /// Expected timeline: immediate, one_month, three_months, six_months,
    /// one_year, no_timeline
    #[arg(long)]
    timeline: String,
    /// Financing posture: pre_approved, cash_buyer, need_approval,
    /// need_to_sell_first, exploring_options
    #[arg(long)]
    financing: String,
    /// Existing representation: no, had_bad_experience, yes_not_exclusive,
    /// yes_exclusive
    #[arg(long)]
    agent_status: String,
    /// Optional urgency reason, e.g. job_relocation or family_growth
    #[arg(long)]
    urgency: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TranscriptArgs {
    /// Read the transcript from a file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Pass the transcript inline
    #[arg(long)]
    text: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the outbound-call portion of the demo
    #[arg(long)]
    skip_call: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let form = QualificationForm {
        intent: Some(args.intent),
        timeline: Some(args.timeline),
        financing: Some(args.financing),
        agent_status: Some(args.agent_status),
        urgency: args.urgency,
    };

    let answers = form.validate().map_err(QualificationServiceError::Input)?;
    let result = score(&answers);

    println!("Score: {}/10", result.score);
    println!("Label: {}", result.label.label());
    println!("Follow-up: {}", result.label.cadence().label());
    Ok(())
}

pub(crate) fn run_transcript(args: TranscriptArgs) -> Result<(), AppError> {
    let transcript = match (args.file, args.text) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(text)) => text,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let summary = extract_summary(&transcript);
    if summary.is_empty() {
        println!("No score or intent signals found in the transcript.");
        return Ok(());
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Summary unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Lead qualification demo");

    let settings = DialerSettings {
        agency_name: "Demo Real Estate Agency".to_string(),
        voice: "maya".to_string(),
    };
    let repository = Arc::new(InMemoryLeadRepository::default());
    let dialer = Arc::new(InMemoryDialer::default());
    let notifier = Arc::new(InMemoryAgentNotifier::default());
    let service = Arc::new(LeadQualificationService::new(
        repository,
        dialer,
        notifier.clone(),
        settings,
    ));

    println!("\nIntake: cash buyer relocating for work");
    let hot = service.submit(LeadSubmission {
        contact: ContactInfo {
            name: "Avery Lindqvist".to_string(),
            phone: "+15155550142".to_string(),
            email: "avery@example.com".to_string(),
        },
        target_area: Some("Des Moines".to_string()),
        form: QualificationForm {
            intent: Some("buy".to_string()),
            timeline: Some("immediate".to_string()),
            financing: Some("cash_buyer".to_string()),
            agent_status: Some("no".to_string()),
            urgency: Some("job_relocation".to_string()),
        },
    })?;
    print_view(&hot);

    println!("\nIntake: browsing couple, several months out");
    let warm = service.submit(LeadSubmission {
        contact: ContactInfo {
            name: "Sam Okafor".to_string(),
            phone: "+15155550177".to_string(),
            email: "sam@example.com".to_string(),
        },
        target_area: None,
        form: QualificationForm {
            intent: Some("both".to_string()),
            timeline: Some("three_months".to_string()),
            financing: Some("need_approval".to_string()),
            agent_status: Some("yes_not_exclusive".to_string()),
            urgency: None,
        },
    })?;
    print_view(&warm);

    if !args.skip_call {
        println!("\nOutbound qualification call for the warm lead");
        let dispatched = service.start_call(&warm.lead_id)?;
        println!("- Dispatched call {}", dispatched.call_id);

        let updated = service.complete_call(CallWebhook {
            call_id: Some(dispatched.call_id),
            call_status: CallWebhookStatus::Completed,
            call_length: Some(142),
            recording_url: None,
            transcript: Some(
                "They got pre-approved last week and want to move immediately. \
Thanks for your time! Your score is 9 out of 10."
                    .to_string(),
            ),
            metadata: Some(WebhookMetadata {
                lead_id: Some(warm.lead_id.0.clone()),
            }),
        })?;
        println!("- Call transcript rescored the lead:");
        print_view(&updated);
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("\nAgent hand-offs: none dispatched");
    } else {
        println!("\nAgent hand-offs:");
        for alert in events {
            println!("- template={} -> {}", alert.template, alert.lead_id.0);
        }
    }

    Ok(())
}

fn print_view(record: &leadqual::workflows::qualification::LeadRecord) {
    let view = record.status_view();
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Status payload unavailable: {err}"),
    }
}
