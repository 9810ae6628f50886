use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mapia::area::{AreaError, DrawnShape, LatLng, NullSurface, ShapeGeometry, ShapeId};
use mapia::config::{ConfigError, MapiaConfig};
use mapia::contact::ContactField;
use mapia::intake::{FileHandle, FileSlot, IntakeError};
use mapia::notify::emailjs::EmailJsClient;
use mapia::notify::{DispatchError, NotificationDispatcher};
use mapia::storage::drive::DriveClient;
use mapia::storage::{
    AccessToken, AuthError, DriveSession, SignIn, StaticTokenSignIn, UploadCoordinator, UploadError,
};
use mapia::submission::inquiry::{InquiryError, InquiryForm, InquiryService};
use mapia::submission::{SubmissionOrchestrator, SubmissionPhase, SubmissionSession, SubmitError};
use mapia::view::{ControlId, FormView, Notice, NoticeKind, StatusSlot};

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid coordinates `{0}`; expected `lat,lng` pairs separated by `;`")]
    InvalidCoordinates(String),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("area rejected: {0}")]
    Area(#[from] AreaError),
    #[error("storage client setup failed: {0}")]
    Storage(#[from] UploadError),
    #[error("notification client setup failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Inquiry(#[from] InquiryError),
}

#[derive(Parser, Debug)]
#[command(name = "mapia", about = "Send Mapia analysis requests and inquiries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit an analysis request with files and/or an area of interest.
    Request(RequestArgs),
    /// Send a quick message from the contact section.
    Inquiry(InquiryArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long, help = slot_help(FileSlot::Image))]
    image: Option<PathBuf>,

    #[arg(long, help = slot_help(FileSlot::Vector))]
    vector: Option<PathBuf>,

    #[arg(long, conflicts_with = "marker", help = "Polygon vertices: \"lat,lng;lat,lng;...\"")]
    polygon: Option<String>,

    #[arg(long, help = "Single point: \"lat,lng\"")]
    marker: Option<String>,

    #[arg(long)]
    hectares: Option<String>,

    #[arg(long)]
    comments: Option<String>,
}

#[derive(Args, Debug)]
struct InquiryArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    message: String,
}

fn slot_help(slot: FileSlot) -> String {
    let what = match slot {
        FileSlot::Image => "Orthomosaic or satellite image",
        FileSlot::Vector => "Field boundary vector file",
    };
    format!("{what} ({})", slot.accepted_formats())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = MapiaConfig::from_env()?;
    let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(EmailJsClient::new(
        &config.emailjs.base_url,
        config.emailjs.public_key.clone(),
        config.emailjs.private_key.clone(),
        config.connect_timeout,
    )?);
    let view = Arc::new(TerminalView::new());

    match cli.command {
        Command::Request(args) => run_request(&config, dispatcher, view, args).await,
        Command::Inquiry(args) => run_inquiry(&config, dispatcher, view, args).await,
    }
}

async fn run_request(
    config: &MapiaConfig,
    dispatcher: Arc<dyn NotificationDispatcher>,
    view: Arc<TerminalView>,
    args: RequestArgs,
) -> Result<(), CliError> {
    let has_files = args.image.is_some() || args.vector.is_some();
    let folder_id = if has_files { config.drive.require_folder()?.to_owned() } else { String::new() };
    let store = DriveClient::new(
        &config.drive.upload_base_url,
        &config.drive.api_base_url,
        config.drive.api_key.clone(),
        config.connect_timeout,
    )?;
    let sign_in: Arc<dyn SignIn> = match &config.drive.access_token {
        Some(token) => Arc::new(StaticTokenSignIn::new(Some(token.clone()))),
        None => Arc::new(TerminalSignIn { client_id: config.drive.client_id.clone() }),
    };
    let uploader = Arc::new(UploadCoordinator::new(store, DriveSession::new(sign_in), folder_id));

    let mut orchestrator = SubmissionOrchestrator::new(
        SubmissionSession::new(Arc::new(NullSurface)),
        uploader,
        dispatcher,
        view,
        config.emailjs.target.clone(),
    );

    orchestrator.set_name(args.name);
    orchestrator.set_email(args.email);
    orchestrator.set_phone(args.phone.unwrap_or_default());
    orchestrator.set_hectares(args.hectares.unwrap_or_default());
    orchestrator.set_comments(args.comments.unwrap_or_default());

    for (slot, path) in [(FileSlot::Image, args.image), (FileSlot::Vector, args.vector)] {
        if let Some(path) = path {
            let file = FileHandle::from_path(&path).await?;
            orchestrator.select_file(slot, file)?;
        }
    }

    let geometry = match (args.polygon, args.marker) {
        (Some(raw), _) => Some(ShapeGeometry::Path(parse_points(&raw)?)),
        (None, Some(raw)) => match parse_points(&raw)?.as_slice() {
            [point] => Some(ShapeGeometry::Point(*point)),
            _ => return Err(CliError::InvalidCoordinates(raw)),
        },
        (None, None) => None,
    };
    if let Some(geometry) = geometry {
        orchestrator.open_map()?;
        orchestrator.shape_completed(DrawnShape { id: ShapeId(1), geometry });
        orchestrator.save_map()?;
    }

    let receipt = orchestrator.submit().await?;
    println!("submission {}", receipt.submission_id);
    for (slot, link) in receipt.links.entries() {
        println!("{}: {link}", slot.link_label());
    }
    Ok(())
}

async fn run_inquiry(
    config: &MapiaConfig,
    dispatcher: Arc<dyn NotificationDispatcher>,
    view: Arc<TerminalView>,
    args: InquiryArgs,
) -> Result<(), CliError> {
    let service = InquiryService::new(dispatcher, view, config.emailjs.target.clone());
    let mut form = InquiryForm {
        name: args.name,
        email: args.email,
        phone: args.phone.unwrap_or_default(),
        message: args.message,
    };
    service.submit(&mut form).await?;
    Ok(())
}

/// `"lat,lng;lat,lng"` into points. Range checks happen at extraction.
fn parse_points(raw: &str) -> Result<Vec<LatLng>, CliError> {
    let invalid = || CliError::InvalidCoordinates(raw.to_owned());
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<LatLng, CliError> {
            let (lat, lng) = pair.split_once(',').ok_or_else(invalid)?;
            let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
            let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
            Ok(LatLng::new(lat, lng))
        })
        .collect()
}

// =============================================================================
// TERMINAL FRONT END
// =============================================================================

/// Prints what a page would render.
struct TerminalView {
    labels: Mutex<HashMap<ControlId, String>>,
}

impl TerminalView {
    fn new() -> Self {
        let labels = HashMap::from([
            (ControlId::RequestSubmit, "Enviar Solicitud".to_owned()),
            (ControlId::InquirySubmit, "Enviar Mensaje".to_owned()),
        ]);
        Self { labels: Mutex::new(labels) }
    }
}

impl FormView for TerminalView {
    fn control_label(&self, control: ControlId) -> String {
        self.labels
            .lock()
            .ok()
            .and_then(|labels| labels.get(&control).cloned())
            .unwrap_or_default()
    }

    fn set_control(&self, control: ControlId, label: &str, enabled: bool) {
        if let Ok(mut labels) = self.labels.lock() {
            labels.insert(control, label.to_owned());
        }
        tracing::debug!(?control, label, enabled, "control");
    }

    fn set_status(&self, slot: StatusSlot, text: &str, filled: bool) {
        if filled {
            println!("[{slot:?}] {}", text.replace('\n', " · "));
        }
    }

    fn reset_picker(&self, slot: FileSlot) {
        tracing::debug!(slot = slot.role(), "picker reset");
    }

    fn focus_field(&self, field: ContactField) {
        eprintln!("→ revisa el campo: {field}");
    }

    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Warning | NoticeKind::Error => eprintln!("{}", notice.message),
        }
    }

    fn phase_changed(&self, phase: SubmissionPhase) {
        tracing::info!(?phase, "submission phase");
    }
}

/// Asks for a Drive access token on stdin when none is configured.
struct TerminalSignIn {
    client_id: Option<String>,
}

#[async_trait]
impl SignIn for TerminalSignIn {
    async fn sign_in(&self) -> Result<AccessToken, AuthError> {
        let mut stderr = tokio::io::stderr();
        if let Some(client_id) = &self.client_id {
            stderr.write_all(format!("Google client id: {client_id}\n").as_bytes()).await?;
        }
        stderr.write_all(b"Drive access token: ").await?;
        stderr.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let token = line.trim();
        if token.is_empty() {
            return Err(AuthError::Declined("no token entered".into()));
        }
        Ok(AccessToken::new(token))
    }
}
