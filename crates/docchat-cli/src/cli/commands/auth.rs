//! Login, registration and identity commands.

use anyhow::{Context, Result};
use docchat_core::auth::UserStore;
use docchat_core::backend::Backend;
use docchat_core::config::Config;
use docchat_core::models::User;
use tracing::info;

pub async fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    let user = super::client(config)?
        .login(email, password)
        .await
        .context("login failed")?;
    remember(&user)?;
    println!("Logged in as {} (user {})", user.email, user.id);
    Ok(())
}

pub async fn register(config: &Config, email: &str, password: &str) -> Result<()> {
    let user = super::client(config)?
        .register(email, password)
        .await
        .context("registration failed")?;
    remember(&user)?;
    println!("Registered and logged in as {} (user {})", user.email, user.id);
    Ok(())
}

fn remember(user: &User) -> Result<()> {
    let store = UserStore::default();
    store.save(user).context("save login")?;
    info!(user = user.id, path = %store.path().display(), "login stored");
    Ok(())
}

pub fn logout() -> Result<()> {
    if UserStore::default().clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    match UserStore::default().load()? {
        Some(user) => println!("{} (user {})", user.email, user.id),
        None => println!("Not logged in."),
    }
    Ok(())
}
