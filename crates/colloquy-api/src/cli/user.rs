//! User management CLI commands: create, create-superuser, list.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use colloquy_types::user::{User, UserFlags};

use crate::state::AppState;

/// Use the given password or prompt for one with confirmation.
fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(Password::new()
            .with_prompt("Password")
            .with_confirmation("Password (again)", "The two password fields didn't match.")
            .interact()?),
    }
}

fn print_created(user: &User, kind: &str, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "id": user.id,
                "email": user.email,
                "is_staff": user.is_staff,
                "is_superuser": user.is_superuser,
            })
        );
    } else {
        println!(
            "  {} {} '{}' created",
            style("✓").green().bold(),
            kind,
            style(&user.email).bold()
        );
    }
}

/// Create a regular user, optionally with staff status.
pub async fn create_user(
    state: &AppState,
    email: &str,
    staff: bool,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    let flags = UserFlags {
        is_staff: Some(staff),
        ..UserFlags::default()
    };
    let user = state.user_service.create_user(email, &password, flags).await?;
    print_created(&user, "User", json);
    Ok(())
}

/// Create a superuser.
pub async fn create_superuser(
    state: &AppState,
    email: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    let user = state
        .user_service
        .create_superuser(email, &password, UserFlags::default())
        .await?;
    print_created(&user, "Superuser", json);
    Ok(())
}

/// List all users.
pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.user_service.list_users().await?;

    if json {
        let rows: Vec<_> = users
            .iter()
            .map(|u| {
                serde_json::json!({
                    "id": u.id,
                    "email": u.email,
                    "is_staff": u.is_staff,
                    "is_superuser": u.is_superuser,
                    "is_active": u.is_active,
                    "last_activity": u.last_activity.to_rfc3339(),
                    "date_joined": u.date_joined.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Add one with: {}",
            style("i").blue().bold(),
            style("colloquy user create-superuser <email>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Email").fg(Color::White),
        Cell::new("Staff").fg(Color::White),
        Cell::new("Active").fg(Color::White),
        Cell::new("Last activity").fg(Color::White),
    ]);

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    for user in &users {
        let staff = if user.is_superuser {
            "superuser"
        } else {
            yes_no(user.is_staff)
        };
        table.add_row(vec![
            Cell::new(&user.email).fg(Color::Cyan),
            Cell::new(staff),
            Cell::new(yes_no(user.is_active)),
            Cell::new(user.last_activity.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} user{}",
        style(users.len()).bold(),
        if users.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
