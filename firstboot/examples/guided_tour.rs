//! Composition root for a full guided-tour run.
//!
//! Reads `Storage/config.json`, wires the loader, executor, observer, and
//! sink, and drives the standard tour. The presentation side here is a
//! channel drain that prints status messages.

use anyhow::Result;
use firstboot::observability::init_tracing;
use firstboot::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ProvisionConfig::load("Storage/config.json").unwrap_or_default();

    let invoker = Arc::new(SystemInvoker::new());
    let executor =
        Arc::new(CommandExecutor::new(invoker).with_package_success(config.success_codes()));

    let (channel_observer, mut rx) = ChannelObserver::new();
    let observer: Arc<dyn StatusObserver> = Arc::new(channel_observer);
    let sink: Arc<dyn ReportSink> = Arc::new(LoggingReportSink);

    let runner = Arc::new(TaskRunner::new(
        executor,
        Arc::clone(&observer),
        sink,
        config.host_identifier(),
    ));
    let loader = Arc::new(JsonCatalogLoader::new(config.functions_dir.clone()));

    let controller = Arc::new(
        PipelineController::new(
            TourPlan::standard(),
            loader,
            runner,
            observer,
            config.placeholder_context(),
        )
        .with_completion(Box::new(|| {
            tracing::info!("provisioning complete");
        })),
    );

    // Presentation side: drain status messages off the worker context.
    let presenter = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match message {
                ObserverMessage::ListReplaced(names) => {
                    println!("-- task list --");
                    for name in names {
                        println!("   {name}");
                    }
                }
                ObserverMessage::StatusChanged(update) => {
                    println!("[{}] {} -> {}", update.index, update.task_name, update.state);
                }
            }
        }
    });

    controller.run_tour().await;
    drop(controller);
    presenter.await?;

    Ok(())
}
