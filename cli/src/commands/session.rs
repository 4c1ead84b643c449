//! Sign-in, sign-out and status.

use anyhow::Result;
use tracing::instrument;

use crate::config::Config;
use crate::context::CliContext;

#[instrument(skip_all, name = "login")]
pub async fn run_login(mut ctx: CliContext, email: Option<String>) -> Result<()> {
    ctx.out.header("Sign in to domwatch");
    ctx.out.newline();

    ctx.login(email).await
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(mut ctx: CliContext) -> Result<()> {
    if !ctx.dashboard.session().has_token() {
        ctx.out.info("Not currently signed in.");
        return Ok(());
    }

    let result = ctx.dashboard.logout();
    ctx.show_notifications();
    result?;
    Ok(())
}

pub fn run_status(ctx: &CliContext) -> Result<()> {
    let out = &ctx.out;
    let config = ctx.dashboard.config();

    if ctx.dashboard.session().has_token() {
        out.success("Signed in");
    } else {
        out.warning("Not signed in. Use 'domwatch login' to sign in.");
    }

    out.newline();
    out.labeled("API", config.api_url());
    out.labeled("Media", &config.media_base_url);
    out.labeled("Config file", Config::config_path()?.display());
    out.labeled("State file", Config::state_path()?.display());

    let features = config.features;
    let flag = |on: bool| if on { "on" } else { "off" };
    out.labeled("Search", flag(features.search));
    out.labeled("Image preview", flag(features.image_preview));
    out.labeled("User management", flag(features.user_management));

    let users = ctx.dashboard.registry().users().len();
    out.labeled("Known users", users);

    Ok(())
}
