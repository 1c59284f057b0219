use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use log::LevelFilter;
use reel_core::{
    load_user_id, update, AppState, AppViewModel, CollectionManager, DragItem, Msg, VideoRef,
    ALL_VIDEOS,
};
use reel_engine::{
    ensure_output_dir, DownloadOutcome, EngineEvent, EngineHandle, FileStore, NotificationUpdate,
    RecordUpdater, RenderBatch,
};
use reel_logging::{reel_debug, reel_info};

use super::cli::{AddArgs, Cli, CollectionsCommand, Command, NotifyArgs, RenderArgs};
use super::config::{load_media, AppConfig};
use super::effects::{map_event, EffectRunner};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    ensure_output_dir(&config.data_dir)?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    reel_logging::initialize(config.log.into(), level, &config.data_dir);
    if cli.config.is_file() {
        reel_debug!("Loaded config from {:?}", cli.config);
    } else {
        reel_info!("No config at {:?}; using defaults", cli.config);
    }

    match cli.command {
        Command::Render(args) => render(&config, args),
        Command::Collections(command) => {
            let media = load_media(cli.media.as_deref())?;
            collections(&config, media, command)
        }
        Command::Download { url } => download(&config, url),
        Command::Notify(args) => notify(&config, args),
    }
}

fn render(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let store = FileStore::open(config.data_dir.clone())?;
    let user_id = config.user_id.clone().or_else(|| load_user_id(&store));

    let mut batch = RenderBatch::new(read_composition(&args.primary)?)
        .with_user_id(user_id)
        .with_template_names(config.template_names.clone());
    for (key, file) in &args.secondaries {
        batch = batch.with_secondary(key.clone(), read_composition(file)?);
    }
    let secondary_count = batch.secondaries.len();

    let engine = EngineHandle::new(config.engine_settings());
    let mut runner = EffectRunner::new(&engine, batch);
    let mut state = dispatch(
        AppState::new(),
        Msg::CreateClicked { secondary_count },
        &mut runner,
    );

    while state.is_busy() {
        let event = engine
            .recv()
            .ok_or_else(|| anyhow!("engine stopped before the render finished"))?;
        if let Some(msg) = map_event(&event) {
            state = dispatch(state, msg, &mut runner);
        }
    }

    let view = state.view();
    print_downloads(&view);

    if args.download {
        for button in &view.downloads {
            state = dispatch(state, Msg::DownloadClicked(button.slot.clone()), &mut runner);
        }
        while runner.pending_downloads() > 0 {
            match engine.recv() {
                Some(EngineEvent::DownloadCompleted(outcome)) => {
                    report_download(&outcome);
                    runner.download_finished();
                }
                Some(_) => {}
                None => bail!("engine stopped before downloads finished"),
            }
        }
    }

    if view.last_error.is_some() {
        bail!("render run did not complete");
    }
    Ok(())
}

/// Applies one message, redraws when the state changed, then runs effects.
fn dispatch(state: AppState, msg: Msg, runner: &mut EffectRunner<'_>) -> AppState {
    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        if let Some(line) = state.view().status_line {
            println!("{line}");
        }
    }
    runner.enqueue(effects);
    state
}

fn print_downloads(view: &AppViewModel) {
    if view.downloads.is_empty() {
        println!("No videos are ready to download.");
        return;
    }
    for button in &view.downloads {
        println!("{}: {}", button.label, button.url);
    }
}

fn collections(
    config: &AppConfig,
    media: Vec<VideoRef>,
    command: CollectionsCommand,
) -> anyhow::Result<()> {
    let store = FileStore::open(config.data_dir.clone())?;
    let mut manager = CollectionManager::new(store, media);

    match command {
        CollectionsCommand::List => print_collections(&manager),
        CollectionsCommand::Create { name } => {
            if !manager.create_collection(&name) {
                bail!("{name:?} cannot be used as a collection name");
            }
            println!("Created collection {name:?}");
        }
        CollectionsCommand::Delete { name } => {
            if name == ALL_VIDEOS {
                bail!("{ALL_VIDEOS:?} cannot be deleted");
            }
            if manager.delete_collection(&name) {
                println!("Deleted collection {name:?}");
            } else {
                println!("No collection named {name:?}");
            }
        }
        CollectionsCommand::Add(args) => {
            if args.name.is_empty() || args.name == ALL_VIDEOS {
                bail!("videos cannot be added to {:?}", args.name);
            }
            let item = drag_item(&manager, &args)?;
            if manager.move_into(&item, &args.name) {
                println!("Added to {:?}", args.name);
            } else {
                println!("Already in {:?}", args.name);
            }
        }
        CollectionsCommand::Reorder { name, from, to } => {
            let dragged = DragItem {
                source_collection: Some(name.clone()),
                index: Some(from),
                ..DragItem::default()
            };
            let order = manager
                .reorder_dragged(&dragged, to)
                .ok_or_else(|| anyhow!("cannot move item {from} to {to} in {name:?}"))?;
            for (index, video) in order.iter().enumerate() {
                println!("  {index}. {}", describe(video));
            }
            println!("Preview only; the stored order is unchanged.");
        }
        CollectionsCommand::Download { name } => {
            let videos = manager
                .collection(&name)
                .ok_or_else(|| anyhow!("no collection named {name:?}"))?
                .to_vec();
            let engine = EngineHandle::new(config.engine_settings());
            engine.download_collection(name, videos);
            loop {
                match engine.recv() {
                    Some(EngineEvent::ArchiveCompleted(result)) => {
                        let summary = result?;
                        println!(
                            "Saved {} videos to {}",
                            summary.entries.len(),
                            summary.path.display()
                        );
                        for skipped in &summary.skipped {
                            println!("  {skipped}");
                        }
                        break;
                    }
                    Some(_) => {}
                    None => bail!("engine stopped before the archive finished"),
                }
            }
        }
    }
    Ok(())
}

fn drag_item(manager: &CollectionManager<FileStore>, args: &AddArgs) -> anyhow::Result<DragItem> {
    if let Some(index) = args.from_media {
        let video = manager
            .collection(ALL_VIDEOS)
            .and_then(|videos| videos.get(index))
            .cloned()
            .ok_or_else(|| anyhow!("no video at position {index} in {ALL_VIDEOS:?}"))?;
        return Ok(DragItem {
            source_collection: Some(ALL_VIDEOS.to_string()),
            index: Some(index),
            ..DragItem::from_video(video)
        });
    }
    let url = args
        .url
        .clone()
        .ok_or_else(|| anyhow!("either --url or --from-media is required"))?;
    Ok(DragItem {
        label: args.label.clone(),
        created_at: args.created_at.clone(),
        ..DragItem::from_id(url)
    })
}

fn print_collections(manager: &CollectionManager<FileStore>) {
    for view in manager.collections() {
        let marker = if view.is_reserved() { " (read-only)" } else { "" };
        println!("{} [{}]{}", view.name, view.videos.len(), marker);
        for (index, video) in view.videos.iter().enumerate() {
            println!("  {index}. {}", describe(video));
        }
    }
}

fn describe(video: &VideoRef) -> String {
    let label = if video.label.is_empty() {
        "Untitled"
    } else {
        video.label.as_str()
    };
    format!("{label} | {} | {}", video.display_created_at(), video.url)
}

fn download(config: &AppConfig, url: String) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.engine_settings());
    engine.download(url);
    loop {
        match engine.recv() {
            Some(EngineEvent::DownloadCompleted(outcome)) => {
                report_download(&outcome);
                return Ok(());
            }
            Some(_) => {}
            None => bail!("engine stopped before the download finished"),
        }
    }
}

fn report_download(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Saved { url, path } => {
            println!("Saved {url} to {}", path.display());
        }
        DownloadOutcome::OpenDirectly { url, reason } => {
            println!("Could not save ({reason}). Open it directly: {url}");
        }
    }
}

fn notify(config: &AppConfig, args: NotifyArgs) -> anyhow::Result<()> {
    let updater = RecordUpdater::new(config.record_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let update = NotificationUpdate {
        record_id: args.record_id,
        status: args.status,
        table_id: args.table_id,
    };

    match runtime.block_on(updater.update_notification_status(&update)) {
        Ok(record) => {
            reel_info!("Notification status updated");
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(err) => bail!("{} (status {})", err, err.status_code()),
    }
}

fn read_composition(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
