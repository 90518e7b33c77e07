//! Helpdesk triage demo.
//!
//! Seeds an in-memory store with requests, works part of the queue the way an
//! operator would, then queries the archive and writes every export format to
//! the directory given as the first argument (default `exports`).

use chrono::Duration;
use helpdesk_core::environment::{Clock, SystemClock};
use helpdesk_triage::{
    ArchiveFilter, Channel, ExportFormat, HelpdeskConfig, OperatorRef, Request, RequestId,
    TriageService, store::InMemoryRequestStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CATEGORIES: [&str; 6] = ["technical", "Оплата", "ACCOUNT", "general", "", "warranty"];
const PROJECTS: [Option<&str>; 3] = [Some("Alpha"), Some("Borealis"), None];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = HelpdeskConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("helpdesk_triage={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        page_size = config.archive.page_size,
        utc_offset_minutes = config.archive.utc_offset_minutes,
        analytics_days = config.analytics.days,
        "Configuration loaded"
    );

    let clock = Arc::new(SystemClock);
    let service = TriageService::new(
        Arc::new(InMemoryRequestStore::new()),
        clock.clone(),
        config,
    );

    // Intake
    for request in seed_requests(clock.as_ref()) {
        service.intake(request).await?;
    }
    info!(pending = service.list_pending().await?.len(), "Seed requests queued");

    // One operator approves and edits through a queue session
    let anna = OperatorRef::new(1, "Anna Petrova");
    let mut session = service.session(anna.clone());
    session.refresh().await?;
    let pending: Vec<RequestId> = session.state().pending().iter().map(|r| r.id).collect();

    for (index, id) in pending.iter().enumerate().take(30) {
        session.select(*id).await?;
        let outcome = if index % 3 == 0 {
            session.set_draft_answer("Thanks for reaching out. We have fixed this on our side.").await;
            session.set_draft_notes("rewritten by operator").await;
            session.submit_selected().await
        } else {
            session.approve_selected().await
        };
        if let Err(error) = outcome {
            warn!(request_id = %id, %error, "Triage action failed");
        }
    }

    // A second approve of a closed request is refused
    if let Some(first) = pending.first() {
        if let Err(error) = service.approve(*first, &anna).await {
            info!(%error, "Repeated approve rejected as expected");
        }
    }

    // Archive
    let filter = ArchiveFilter::new().with_project("Alpha");
    let page = service.query_archive(&filter, 1).await?;
    let selector: Vec<String> = page.selector.iter().map(ToString::to_string).collect();
    let projects = service.project_options().await?;
    info!(
        total = page.total,
        matched = page.matched,
        page = page.current_page,
        total_pages = page.total_pages,
        selector = %selector.join(" "),
        ?projects,
        "Archive page"
    );

    // Exports
    let out_dir = std::env::args().nth(1).map_or_else(|| PathBuf::from("exports"), PathBuf::from);
    tokio::fs::create_dir_all(&out_dir).await?;

    for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Html] {
        let archive = service.export_archive(&filter, format).await?;
        tokio::fs::write(out_dir.join(&archive.file_name), &archive.bytes).await?;

        let summary = service.export_summary(None, format).await?;
        tokio::fs::write(out_dir.join(&summary.file_name), &summary.bytes).await?;
    }

    let dashboard = service.dashboard(Some(7)).await?;
    info!(
        total = dashboard.summary.total,
        pending = dashboard.summary.pending,
        approved = dashboard.summary.approved,
        edited = dashboard.summary.edited,
        out_dir = %out_dir.display(),
        "Done"
    );
    Ok(())
}

fn seed_requests(clock: &dyn Clock) -> Vec<Request> {
    let now = clock.now();
    (1..=45u64)
        .map(|id| {
            let index = usize::try_from(id).unwrap_or_default();
            let created_at = now - Duration::hours(i64::try_from(id * 7).unwrap_or_default());
            let mut request = Request::new(
                RequestId::new(id),
                if id % 2 == 0 { Channel::Email } else { Channel::Form },
                format!("Request #{id}: the device stopped responding after the update"),
                format!("Please restart the device and install firmware 2.{id}"),
                f64::from(u32::try_from(id % 10).unwrap_or_default()) / 10.0,
                created_at,
            );
            request.email = Some(format!("client{id}@example.com"));
            request.full_name = Some(format!("Client {id}"));
            request.organization = Some(if id % 4 == 0 { "ACME Ltd" } else { "Northwind" }.to_string());
            request.category = Some(CATEGORIES[index % CATEGORIES.len()].to_string());
            request.project = PROJECTS[index % PROJECTS.len()].map(str::to_string);
            request.device_type = Some("Terminal T-100".to_string());
            request.serial_number = Some(format!("SN-{:05}", id * 31));
            request
        })
        .collect()
}
