use anyhow::{Result, bail};
use staffdesk_core::identity::Identity;

use crate::bootstrap::Context;

pub async fn login(
    context: &Context,
    token: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let session = context.session();
    session.initialize().await;

    let state = match (token, email, password) {
        (Some(token), _, _) => session.login(&token).await,
        (None, Some(email), Some(password)) => session.login_with_credentials(&email, &password).await?,
        _ => bail!("Pass either --token or --email with --password"),
    };

    match state.identity {
        Some(identity) => {
            println!("✅ Signed in");
            print_identity(&identity);
            Ok(())
        }
        None => bail!("Sign-in failed: the backend rejected the token"),
    }
}

pub fn logout(context: &Context) -> Result<()> {
    context.session().logout();
    println!("👋 Signed out");
    Ok(())
}

pub async fn whoami(context: &Context, json: bool) -> Result<()> {
    let state = context.session().initialize().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    match state.identity {
        Some(identity) => print_identity(&identity),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("  id:    {}", identity.id);
    println!("  email: {}", identity.email);
    let roles: Vec<&str> = identity.roles.iter().collect();
    if roles.is_empty() {
        println!("  roles: (none)");
    } else {
        println!("  roles: {}", roles.join(", "));
    }
}
