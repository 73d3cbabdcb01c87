// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use campusshare::backend::rest::RestBackend;
use campusshare::config::Config;
use campusshare::mvu::{Msg, Services};
use campusshare::pages::auth::AuthMsg;
use campusshare::pages::resource_list::ResourceListMsg;
use campusshare::runtime::App;

const TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    let backend = RestBackend::new(config.backend_url.clone(), config.anon_key.clone())
        .context("Failed to set up backend client")?;
    let services = Services {
        backend: Arc::new(backend),
        bucket: config.bucket.clone(),
        download_dir: config.download_dir.clone(),
    };
    let mut app = App::new(services, config.workers);

    let email = env::var("CAMPUSSHARE_EMAIL").context("CAMPUSSHARE_EMAIL is not set")?;
    let password = env::var("CAMPUSSHARE_PASSWORD").context("CAMPUSSHARE_PASSWORD is not set")?;
    app.send(Msg::Auth(AuthMsg::LoginEmailChanged(email)));
    app.send(Msg::Auth(AuthMsg::LoginPasswordChanged(password)));
    app.send(Msg::Auth(AuthMsg::SubmitLogin));
    if !app.run_until_idle(TIMEOUT) {
        bail!("Timed out signing in");
    }
    if let Some(err) = app.model().auth.login.error() {
        bail!("{err}");
    }

    if let Some(search) = env::args().nth(1) {
        app.send(Msg::List(ResourceListMsg::SearchChanged(search)));
        if !app.run_until_idle(TIMEOUT) {
            bail!("Timed out listing resources");
        }
    }

    let model = app.model();
    if let Some(profile) = model.session.as_ref().map(|s| s.profile()) {
        info!(user = %profile.email, department = %profile.department, "signed in");
    }
    if let Some(err) = model.list.error() {
        bail!("{err}");
    }
    for resource in model.list.resources() {
        println!(
            "{}\t{}\t{}\t{}\t{} downloads",
            resource.title,
            resource.category.label(),
            resource.term_label(),
            resource.uploader_name(),
            resource.download_count
        );
    }
    println!("{}", campusshare::models::resource::results_label(model.list.resources().len()));
    Ok(())
}
