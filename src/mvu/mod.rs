// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring page state, routing, the session, and commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::logic::detail::{self, DownloadOutcome, ResourceDetail};
use crate::logic::listing::list_resources;
use crate::logic::query::ResourceFilters;
use crate::logic::submission::{self, Submission, SubmitOutcome};
use crate::models::resource::Resource;
use crate::models::user::{ProfileMetadata, UserProfile};
use crate::pages::auth::{self, AuthCommand, AuthModel, AuthMsg};
use crate::pages::resource_detail::{
    self, ResourceDetailCommand, ResourceDetailModel, ResourceDetailMsg,
};
use crate::pages::resource_list::{self, ResourceListCommand, ResourceListModel, ResourceListMsg};
use crate::pages::upload::{self, UploadCommand, UploadModel, UploadMsg};
use crate::pages::{Failure, PageEvent, Route};
use crate::session::{self, Session};

pub const SIGN_IN_REQUIRED: &str = "Please sign in to continue.";

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Current route after guards were applied.
    pub route: Route,
    /// Signed-in user, if any.
    pub session: Option<Session>,
    pub list: ResourceListModel,
    pub upload: UploadModel,
    pub detail: ResourceDetailModel,
    pub auth: AuthModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    Navigate(Route),
    /// Resolve a stored access token into a session.
    RestoreSession(String),
    SignOutRequested,
    SignedIn(Result<Session, Failure>),
    Registered(Result<Option<Session>, Failure>),
    SessionRestored(Result<Session, Failure>),
    SignedOut(Result<(), Failure>),
    ProfileRefreshed(Result<Option<UserProfile>, Failure>),
    PointsAwarded {
        user_id: Uuid,
        amount: i64,
        result: Result<(), Failure>,
    },
    DownloadCounted {
        resource_id: Uuid,
        result: Result<(), Failure>,
    },
    DownloadFinished(Result<DownloadOutcome, Failure>),
    DismissError,
    List(ResourceListMsg),
    Upload(UploadMsg),
    Detail(ResourceDetailMsg),
    Auth(AuthMsg),
}

/// Commands represent side-effects executed off the update loop.
#[derive(Debug)]
pub enum Command {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        metadata: ProfileMetadata,
    },
    SignOut(Session),
    Restore(String),
    RefreshProfile(Session),
    FetchResources {
        session: Session,
        filters: ResourceFilters,
    },
    LoadDetail {
        token: Option<String>,
        id: Uuid,
    },
    LoadForEdit {
        session: Session,
        id: Uuid,
    },
    Submit {
        session: Session,
        submission: Submission,
    },
    AwardPoints {
        session: Session,
        user_id: Uuid,
        amount: i64,
    },
    SubmitReview {
        session: Session,
        resource_id: Uuid,
        rating: u8,
        comment: String,
    },
    CountDownload {
        token: Option<String>,
        resource_id: Uuid,
    },
    Download {
        url: String,
        title: String,
    },
    /// Wait, then navigate.
    Redirect {
        to: Route,
        after: Duration,
    },
}

/// Shared handles commands run against.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn Backend>,
    /// Storage bucket for uploaded files.
    pub bucket: String,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Navigate(route) => navigate(model, route, cmds),
        Msg::RestoreSession(token) => cmds.push(Command::Restore(token)),
        Msg::DismissError => model.error = None,
        Msg::SignOutRequested => {
            if let Some(session) = model.session.take() {
                cmds.push(Command::SignOut(session));
            }
            model.list = ResourceListModel::default();
            model.upload = UploadModel::default();
            model.detail = ResourceDetailModel::default();
            surface_event(model, "Signed out".to_string(), false);
            navigate(model, Route::Login, cmds);
        }
        Msg::SignedIn(result) => {
            let outcome = result.map(|session| {
                model.session = Some(session);
            });
            let succeeded = outcome.is_ok();
            dispatch_auth(model, AuthMsg::LoginFinished(outcome), cmds);
            if succeeded {
                navigate(model, Route::Resources, cmds);
            }
        }
        Msg::Registered(result) => {
            let outcome = result.map(|session| {
                let signed_in = session.is_some();
                if signed_in {
                    model.session = session;
                }
                signed_in
            });
            let succeeded = outcome.is_ok();
            dispatch_auth(model, AuthMsg::RegisterFinished(outcome), cmds);
            if succeeded {
                navigate(model, Route::Home, cmds);
            }
        }
        Msg::SessionRestored(result) => match result {
            Ok(session) => {
                info!(user = %session.user_id(), "session restored");
                model.session = Some(session);
                let route = model.route;
                navigate(model, route, cmds);
            }
            Err(failure) => {
                warn!(error = %failure.message, "stored session is no longer valid");
                model.session = None;
            }
        },
        Msg::SignedOut(result) => {
            if let Err(failure) = result {
                warn!(error = %failure.message, "sign-out request failed");
            }
        }
        Msg::ProfileRefreshed(result) => match result {
            Ok(Some(profile)) => {
                if let Some(session) = model.session.as_mut().filter(|s| s.user_id() == profile.id) {
                    session.set_profile(profile);
                }
            }
            Ok(None) => warn!("profile row missing on refresh"),
            Err(failure) => warn!(error = %failure.message, "profile refresh failed"),
        },
        Msg::PointsAwarded {
            user_id,
            amount,
            result,
        } => match result {
            Ok(()) => {
                info!(user = %user_id, amount, "points awarded");
                if let Some(session) = model.session.as_ref().filter(|s| s.user_id() == user_id) {
                    cmds.push(Command::RefreshProfile(session.clone()));
                }
            }
            Err(failure) => warn!(user = %user_id, amount, error = %failure.message, "awarding points failed"),
        },
        Msg::DownloadCounted {
            resource_id,
            result,
        } => {
            if let Err(failure) = result {
                warn!(resource = %resource_id, error = %failure.message, "download count not updated");
            }
        }
        Msg::DownloadFinished(result) => match result {
            Ok(DownloadOutcome::Saved(path)) => {
                surface_event(model, format!("Downloaded to {}", path.display()), false)
            }
            Ok(DownloadOutcome::OpenedExternally { url, .. }) => {
                surface_event(model, format!("Opened {url} externally"), false)
            }
            Err(failure) => surface_event(model, format!("Download failed: {}", failure.message), true),
        },
        Msg::List(m) => {
            let mut list_cmds = Vec::new();
            if let Some(event) =
                resource_list::update(&mut model.list, m, model.session.as_ref(), &mut list_cmds)
            {
                surface(model, event);
            }
            for c in list_cmds {
                match c {
                    ResourceListCommand::Fetch(filters) => match model.session.clone() {
                        Some(session) => cmds.push(Command::FetchResources { session, filters }),
                        None => warn!("listing requested without a session"),
                    },
                    ResourceListCommand::Download {
                        resource_id,
                        url,
                        title,
                    } => queue_download(model, resource_id, url, title, cmds),
                }
            }
        }
        Msg::Upload(m) => {
            let mut upload_cmds = Vec::new();
            if let Some(event) =
                upload::update(&mut model.upload, m, model.session.as_ref(), &mut upload_cmds)
            {
                surface(model, event);
            }
            for c in upload_cmds {
                match c {
                    UploadCommand::LoadResource(id) => match model.session.clone() {
                        Some(session) => cmds.push(Command::LoadForEdit { session, id }),
                        None => surface_event(model, SIGN_IN_REQUIRED.to_string(), true),
                    },
                    UploadCommand::Submit(submission) => match model.session.clone() {
                        Some(session) => cmds.push(Command::Submit {
                            session,
                            submission,
                        }),
                        None => surface_event(model, SIGN_IN_REQUIRED.to_string(), true),
                    },
                    UploadCommand::AwardPoints { user_id, amount } => {
                        if let Some(session) = model.session.clone() {
                            cmds.push(Command::AwardPoints {
                                session,
                                user_id,
                                amount,
                            });
                        }
                    }
                    UploadCommand::Redirect { to, after } => cmds.push(Command::Redirect { to, after }),
                }
            }
        }
        Msg::Detail(m) => {
            let mut detail_cmds = Vec::new();
            if let Some(event) = resource_detail::update(
                &mut model.detail,
                m,
                model.session.as_ref(),
                &mut detail_cmds,
            ) {
                surface(model, event);
            }
            for c in detail_cmds {
                match c {
                    ResourceDetailCommand::Load(id) => cmds.push(Command::LoadDetail {
                        token: access_token(model),
                        id,
                    }),
                    ResourceDetailCommand::SubmitReview {
                        resource_id,
                        rating,
                        comment,
                    } => {
                        if let Some(session) = model.session.clone() {
                            cmds.push(Command::SubmitReview {
                                session,
                                resource_id,
                                rating,
                                comment,
                            });
                        }
                    }
                    ResourceDetailCommand::Download {
                        resource_id,
                        url,
                        title,
                    } => queue_download(model, resource_id, url, title, cmds),
                }
            }
        }
        Msg::Auth(m) => dispatch_auth(model, m, cmds),
    }
}

/// Execute a command and return the resulting message.
pub fn run_command(cmd: Command, services: &Services) -> Msg {
    let backend = services.backend.as_ref();
    match cmd {
        Command::SignIn { email, password } => {
            Msg::SignedIn(session::sign_in(backend, &email, &password).map_err(Failure::from))
        }
        Command::SignUp {
            email,
            password,
            metadata,
        } => Msg::Registered(
            session::sign_up(backend, &email, &password, &metadata).map_err(Failure::from),
        ),
        Command::SignOut(session) => {
            Msg::SignedOut(session::sign_out(backend, &session).map_err(Failure::from))
        }
        Command::Restore(token) => {
            Msg::SessionRestored(session::restore(backend, &token).map_err(Failure::from))
        }
        Command::RefreshProfile(session) => Msg::ProfileRefreshed(
            session::refresh_profile(backend, &session).map_err(Failure::from),
        ),
        Command::FetchResources { session, filters } => Msg::List(ResourceListMsg::Loaded(
            list_resources(backend, &session, &filters).map_err(Failure::from),
        )),
        Command::LoadDetail { token, id } => {
            let result: Result<ResourceDetail, Failure> =
                detail::load_detail(backend, token.as_deref(), id).map_err(Failure::from);
            Msg::Detail(ResourceDetailMsg::Loaded(result))
        }
        Command::LoadForEdit { session, id } => {
            let result: Result<Resource, Failure> =
                detail::load_resource(backend, &session, id).map_err(Failure::from);
            Msg::Upload(UploadMsg::Loaded(result))
        }
        Command::Submit {
            session,
            submission,
        } => {
            let result: Result<SubmitOutcome, Failure> =
                submission::submit(backend, &session, &services.bucket, &submission)
                    .map_err(Failure::from);
            Msg::Upload(UploadMsg::Submitted(result))
        }
        Command::AwardPoints {
            session,
            user_id,
            amount,
        } => Msg::PointsAwarded {
            user_id,
            amount,
            result: submission::award_upload_points(backend, &session, user_id, amount)
                .map_err(Failure::from),
        },
        Command::SubmitReview {
            session,
            resource_id,
            rating,
            comment,
        } => Msg::Detail(ResourceDetailMsg::ReviewSubmitted(
            detail::submit_review(backend, &session, resource_id, rating, &comment)
                .map(|_| ())
                .map_err(Failure::from),
        )),
        Command::CountDownload { token, resource_id } => Msg::DownloadCounted {
            resource_id,
            result: detail::count_download(backend, token.as_deref(), resource_id)
                .map_err(Failure::from),
        },
        Command::Download { url, title } => Msg::DownloadFinished(
            detail::download(backend, &url, &title, &services.download_dir).map_err(Failure::from),
        ),
        Command::Redirect { to, after } => {
            std::thread::sleep(after);
            Msg::Navigate(to)
        }
    }
}

/// Apply route guards, switch route, and kick off the page's initial load.
fn navigate(model: &mut AppModel, requested: Route, cmds: &mut Vec<Command>) {
    let signed_in = model.session.is_some();
    let route = match requested {
        r if r.requires_session() && !signed_in => Route::Login,
        Route::Home if signed_in => Route::Resources,
        r => r,
    };
    model.route = route;

    match route {
        Route::Resources => update(model, Msg::List(ResourceListMsg::Refresh), cmds),
        Route::Resource(id) => update(model, Msg::Detail(ResourceDetailMsg::Open(id)), cmds),
        Route::Upload => update(model, Msg::Upload(UploadMsg::StartCreate), cmds),
        Route::Edit(id) => update(model, Msg::Upload(UploadMsg::StartEdit(id)), cmds),
        Route::Profile => {
            if let Some(session) = model.session.clone() {
                cmds.push(Command::RefreshProfile(session));
            }
        }
        Route::Home | Route::Login | Route::Register => {}
    }
}

fn dispatch_auth(model: &mut AppModel, msg: AuthMsg, cmds: &mut Vec<Command>) {
    let mut auth_cmds = Vec::new();
    if let Some(event) = auth::update(&mut model.auth, msg, &mut auth_cmds) {
        surface(model, event);
    }
    for c in auth_cmds {
        match c {
            AuthCommand::SignIn { email, password } => cmds.push(Command::SignIn { email, password }),
            AuthCommand::SignUp {
                email,
                password,
                metadata,
            } => cmds.push(Command::SignUp {
                email,
                password,
                metadata,
            }),
        }
    }
}

/// Count the download, then fetch the file; both run independently.
fn queue_download(
    model: &AppModel,
    resource_id: Uuid,
    url: String,
    title: String,
    cmds: &mut Vec<Command>,
) {
    cmds.push(Command::CountDownload {
        token: access_token(model),
        resource_id,
    });
    cmds.push(Command::Download { url, title });
}

fn access_token(model: &AppModel) -> Option<String> {
    model.session.as_ref().map(|s| s.access_token().to_string())
}

fn surface(model: &mut AppModel, event: PageEvent) {
    surface_event(model, event.message, event.is_error);
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, Operation};
    use crate::logic::query::tests::resource;
    use crate::logic::submission::EDIT_DENIED;
    use crate::logic::submission::tests::{signed_up, temp_file};
    use crate::pages::REDIRECT_DELAY;
    use crate::pages::upload::{LOAD_FAILED, NOT_LOADED};
    use tempfile::TempDir;

    struct Harness {
        backend: Arc<MemoryBackend>,
        services: Services,
        model: AppModel,
        redirects: Vec<(Route, Duration)>,
        _downloads: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let backend = Arc::new(MemoryBackend::new());
            let downloads = TempDir::new().unwrap();
            let services = Services {
                backend: backend.clone(),
                bucket: "resources".into(),
                download_dir: downloads.path().to_path_buf(),
            };
            Self {
                backend,
                services,
                model: AppModel::default(),
                redirects: Vec::new(),
                _downloads: downloads,
            }
        }

        /// Run a message and every command it causes, recording redirects instead of sleeping.
        fn send(&mut self, msg: Msg) {
            let mut queue = Vec::new();
            update(&mut self.model, msg, &mut queue);
            while !queue.is_empty() {
                let cmd = queue.remove(0);
                if let Command::Redirect { to, after } = cmd {
                    self.redirects.push((to, after));
                    continue;
                }
                let reply = run_command(cmd, &self.services);
                update(&mut self.model, reply, &mut queue);
            }
        }

        fn sign_in_as(&mut self, email: &str) -> Session {
            let session = signed_up(&self.backend, email, "Central Campus");
            self.send(Msg::SignedIn(Ok(session.clone())));
            session
        }
    }

    #[test]
    fn protected_routes_redirect_to_login_without_session() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Route::Upload), &mut cmds);
        assert_eq!(model.route, Route::Login);
        update(&mut model, Msg::Navigate(Route::Edit(Uuid::new_v4())), &mut cmds);
        assert_eq!(model.route, Route::Login);
        update(&mut model, Msg::Navigate(Route::Resources), &mut cmds);
        assert_eq!(model.route, Route::Resources);
        assert!(cmds.is_empty(), "no fetch without a department scope");
    }

    #[test]
    fn sign_in_lands_on_resource_list_and_fetches() {
        let mut h = Harness::new();
        signed_up(&h.backend, "asha@uni.edu", "Central Campus");
        h.send(Msg::Auth(AuthMsg::LoginEmailChanged("asha@uni.edu".into())));
        h.send(Msg::Auth(AuthMsg::LoginPasswordChanged("pw".into())));
        h.send(Msg::Auth(AuthMsg::SubmitLogin));

        assert_eq!(h.model.route, Route::Resources);
        assert!(h.model.session.is_some());
        assert!(!h.model.list.is_loading());
        assert!(h.model.list.error().is_none());
    }

    #[test]
    fn bad_credentials_keep_user_on_login() {
        let mut h = Harness::new();
        h.send(Msg::Navigate(Route::Login));
        h.send(Msg::Auth(AuthMsg::LoginEmailChanged("nobody@uni.edu".into())));
        h.send(Msg::Auth(AuthMsg::LoginPasswordChanged("pw".into())));
        h.send(Msg::Auth(AuthMsg::SubmitLogin));

        assert_eq!(h.model.route, Route::Login);
        assert!(h.model.session.is_none());
        assert_eq!(h.model.auth.login.error(), Some("Invalid login credentials"));
    }

    #[test]
    fn home_redirects_signed_in_users_to_resources() {
        let mut h = Harness::new();
        h.sign_in_as("asha@uni.edu");
        h.send(Msg::Navigate(Route::Home));
        assert_eq!(h.model.route, Route::Resources);
    }

    #[test]
    fn repeated_uploads_create_rows_and_award_points_each_time() {
        let mut h = Harness::new();
        let session = h.sign_in_as("asha@uni.edu");
        let dir = TempDir::new().unwrap();
        let file = temp_file(&dir, "notes.pdf", b"%PDF");

        for _ in 0..2 {
            h.send(Msg::Navigate(Route::Upload));
            h.send(Msg::Upload(UploadMsg::TitleChanged("Same notes".into())));
            h.send(Msg::Upload(UploadMsg::FilePicked(file.path.clone())));
            h.send(Msg::Upload(UploadMsg::Submit));
            assert!(h.model.upload.succeeded());
        }

        assert_eq!(h.backend.resources().len(), 2);
        assert_eq!(
            h.backend.point_awards(),
            vec![(session.user_id(), 10), (session.user_id(), 10)]
        );
        assert_eq!(h.backend.profile(session.user_id()).unwrap().points, 20);
        let refreshed = h.model.session.as_ref().unwrap().profile().points;
        assert_eq!(refreshed, 20);
        assert_eq!(h.redirects, vec![(Route::Home, REDIRECT_DELAY); 2]);
    }

    #[test]
    fn failed_point_award_is_not_shown_to_the_user() {
        let mut h = Harness::new();
        let session = h.sign_in_as("asha@uni.edu");
        h.backend.fail(Operation::IncrementPoints);
        let dir = TempDir::new().unwrap();

        h.send(Msg::Navigate(Route::Upload));
        h.send(Msg::Upload(UploadMsg::FilePicked(
            temp_file(&dir, "notes.pdf", b"%PDF").path,
        )));
        h.send(Msg::Upload(UploadMsg::Submit));

        assert!(h.model.upload.succeeded());
        assert!(h.model.error.is_none());
        assert_eq!(h.backend.resources().len(), 1);
        assert_eq!(h.backend.profile(session.user_id()).unwrap().points, 0);
    }

    #[test]
    fn editing_someone_elses_resource_is_denied_and_redirects_to_profile() {
        let mut h = Harness::new();
        let foreign = resource("Theirs", "Computer Science");
        h.backend.seed_resource(foreign.clone());
        h.sign_in_as("asha@uni.edu");

        h.send(Msg::Navigate(Route::Edit(foreign.id)));

        assert_eq!(h.model.upload.error(), Some(EDIT_DENIED));
        assert_eq!(h.redirects, vec![(Route::Profile, REDIRECT_DELAY)]);
        assert_eq!(h.backend.resource(foreign.id).unwrap(), foreign);
    }

    #[test]
    fn editing_missing_resource_shows_load_failure() {
        let mut h = Harness::new();
        h.sign_in_as("asha@uni.edu");
        h.send(Msg::Navigate(Route::Edit(Uuid::new_v4())));
        assert_eq!(h.model.upload.error(), Some(LOAD_FAILED));
        assert!(h.redirects.is_empty());
    }

    #[test]
    fn download_counts_and_saves_file() {
        let mut h = Harness::new();
        let session = h.sign_in_as("asha@uni.edu");
        let dir = TempDir::new().unwrap();
        h.send(Msg::Navigate(Route::Upload));
        h.send(Msg::Upload(UploadMsg::TitleChanged("Graphs".into())));
        h.send(Msg::Upload(UploadMsg::FilePicked(
            temp_file(&dir, "graphs.txt", b"edges").path,
        )));
        h.send(Msg::Upload(UploadMsg::Submit));
        let id = h.backend.resources()[0].id;

        h.send(Msg::Navigate(Route::Resource(id)));
        assert_eq!(h.model.detail.resource().map(|r| r.id), Some(id));
        assert!(h.model.detail.is_mine(Some(&session)));

        h.send(Msg::Detail(ResourceDetailMsg::Download));
        assert_eq!(h.backend.resource(id).unwrap().download_count, 1);
        assert!(h.model.error.is_none());
        let saved = h.services.download_dir.join("Graphs.txt");
        assert_eq!(std::fs::read(saved).unwrap(), b"edges");
    }

    #[test]
    fn review_round_trip_reloads_detail() {
        let mut h = Harness::new();
        h.sign_in_as("asha@uni.edu");
        let row = resource("Notes", "Computer Science");
        h.backend.seed_resource(row.clone());

        h.send(Msg::Navigate(Route::Resource(row.id)));
        h.send(Msg::Detail(ResourceDetailMsg::RatingChanged(4)));
        h.send(Msg::Detail(ResourceDetailMsg::CommentChanged("clear".into())));
        h.send(Msg::Detail(ResourceDetailMsg::SubmitReview));

        assert_eq!(h.model.detail.reviews().len(), 1);
        assert_eq!(h.model.detail.average_rating(), "4.0");
    }

    #[test]
    fn sign_out_clears_session_and_goes_to_login() {
        let mut h = Harness::new();
        let session = h.sign_in_as("asha@uni.edu");
        h.send(Msg::SignOutRequested);
        assert!(h.model.session.is_none());
        assert_eq!(h.model.route, Route::Login);
        assert!(h.backend.current_user(session.access_token()).is_err());
    }

    #[test]
    fn sign_out_forgets_forms_and_open_resource() {
        let mut h = Harness::new();
        let session = h.sign_in_as("asha@uni.edu");
        let mut own = resource("Mine", "Computer Science");
        own.uploaded_by = session.user_id();
        h.backend.seed_resource(own.clone());

        h.send(Msg::Navigate(Route::Resource(own.id)));
        h.send(Msg::Navigate(Route::Edit(own.id)));
        assert_eq!(h.model.upload.title, "Mine");
        assert!(h.model.detail.resource().is_some());

        h.send(Msg::SignOutRequested);
        assert!(h.model.upload.title.is_empty());
        assert!(!h.model.upload.is_editing());
        assert!(h.model.upload.original_file_url().is_none());
        assert!(h.model.detail.resource().is_none());
    }

    #[test]
    fn edit_submit_before_form_is_populated_leaves_row_intact() {
        let mut h = Harness::new();
        h.sign_in_as("asha@uni.edu");
        let dir = TempDir::new().unwrap();
        h.send(Msg::Navigate(Route::Upload));
        h.send(Msg::Upload(UploadMsg::TitleChanged("Precious".into())));
        h.send(Msg::Upload(UploadMsg::SubjectChanged("Algorithms".into())));
        h.send(Msg::Upload(UploadMsg::FilePicked(
            temp_file(&dir, "precious.pdf", b"%PDF").path,
        )));
        h.send(Msg::Upload(UploadMsg::Submit));
        let before = h.backend.resources()[0].clone();

        // Load still in flight: the submit is dropped.
        let mut pending = Vec::new();
        update(&mut h.model, Msg::Navigate(Route::Edit(before.id)), &mut pending);
        h.send(Msg::Upload(UploadMsg::Submit));
        assert!(h.model.upload.is_loading());

        // Load failed: the empty form is refused.
        h.send(Msg::Upload(UploadMsg::Loaded(Err(Failure::new("timeout")))));
        h.send(Msg::Upload(UploadMsg::Submit));
        assert_eq!(h.model.upload.error(), Some(NOT_LOADED));

        let after = h.backend.resource(before.id).unwrap();
        assert_eq!(after.title, "Precious");
        assert_eq!(after.subject, "Algorithms");
        assert_eq!(after, before);
    }

    #[test]
    fn restoring_a_token_re_enters_current_route() {
        let mut h = Harness::new();
        let session = signed_up(&h.backend, "asha@uni.edu", "Central Campus");
        h.send(Msg::Navigate(Route::Resources));
        h.send(Msg::RestoreSession(session.access_token().to_string()));
        assert_eq!(h.model.session.as_ref().map(Session::user_id), Some(session.user_id()));
        assert_eq!(h.model.route, Route::Resources);
    }

    #[test]
    fn dismiss_error_keeps_status() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::DownloadFinished(Err(Failure::new("offline"))),
            &mut cmds,
        );
        assert_eq!(model.error.as_deref(), Some("Download failed: offline"));
        update(&mut model, Msg::DismissError, &mut cmds);
        assert!(model.error.is_none());
        assert!(model.status.is_some());
    }
}
