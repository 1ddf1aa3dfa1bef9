//! gmpm - profile manager for Logitech G gaming mice, built on ratbagctl.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use clap::Parser;
use console::style;
use serde::Serialize;

use gmpm::cli::{Cli, Intent};
use gmpm::device;
use gmpm::error::{GmpmError, Result};
use gmpm::gateway::{CommandGateway, RatbagctlGateway};
use gmpm::manager::{CycleOutcome, Manager};
use gmpm::profile::{Profile, apply};
use gmpm::{colorname, logging, store};

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    logging::init_logging(cli.json, cli.verbose, cli.quiet);

    // Run the selected intent
    let result = run(&cli);

    // Handle errors
    if let Err(e) = result {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let Some(intent) = cli.intent() else {
        print_no_intent(cli);
        return Ok(());
    };

    let gateway = RatbagctlGateway::new();
    let handle = device::discover(&gateway)?;
    let store_file = store::store_path(&handle.model)?;
    let mut manager = Manager::open(&gateway, handle, store_file)?;

    match intent {
        Intent::Activate => cmd_activate(cli, &mut manager),
        Intent::Cycle => cmd_cycle(cli, &mut manager),
        Intent::Delete => cmd_delete(cli, &mut manager),
        Intent::List => cmd_list(cli, &manager),
        Intent::New => cmd_new(cli, &mut manager),
        Intent::Show => cmd_show(cli, &manager, &gateway),
        Intent::Update => cmd_update(cli, &mut manager),
    }
}

// === Command Implementations ===

fn cmd_activate(cli: &Cli, manager: &mut Manager) -> Result<()> {
    manager.activate(&cli.profile_name)?;

    if cli.json {
        output_json(&serde_json::json!({
            "ok": true,
            "activated": cli.profile_name,
        }));
    } else if !cli.quiet {
        println!(
            "Profile '{}' successfully written to {}",
            style(&cli.profile_name).green(),
            manager.handle().model_display()
        );
    }
    Ok(())
}

fn cmd_cycle(cli: &Cli, manager: &mut Manager) -> Result<()> {
    let outcome = manager.cycle()?;

    if cli.json {
        output_json(&outcome);
        return Ok(());
    }

    match outcome {
        CycleOutcome::Applied { to, .. } => {
            if !cli.quiet {
                println!(
                    "Profile '{}' successfully written to {}",
                    style(&to).green(),
                    manager.handle().model_display()
                );
            }
        }
        CycleOutcome::TooFew { count, sole } => {
            match sole {
                Some(name) => println!("Only 1 profile found: '{name}'"),
                None => println!("Only {count} profile(s) found"),
            }
            print_help_pointer();
        }
    }
    Ok(())
}

fn cmd_delete(cli: &Cli, manager: &mut Manager) -> Result<()> {
    manager.delete(&cli.profile_name)?;

    if cli.json {
        output_json(&serde_json::json!({
            "ok": true,
            "deleted": cli.profile_name,
        }));
    } else if !cli.quiet {
        println!(
            "Deleted {} profile '{}'",
            manager.handle().model_display(),
            cli.profile_name
        );
    }
    Ok(())
}

fn cmd_list(cli: &Cli, manager: &Manager) -> Result<()> {
    let names = manager.list();

    if cli.json {
        output_json(&serde_json::json!({
            "model": manager.handle().model,
            "active": manager.state().last_active_profile,
            "profiles": names,
        }));
        return Ok(());
    }

    if names.is_empty() {
        println!(
            "No saved {} profiles",
            manager.handle().model_display()
        );
    } else {
        println!(
            "Found the following {} profiles:",
            manager.handle().model_display()
        );
        for (idx, name) in names.iter().enumerate() {
            println!("  {}. {name}", idx + 1);
        }
    }
    print_help_pointer();
    Ok(())
}

fn cmd_new(cli: &Cli, manager: &mut Manager) -> Result<()> {
    manager.create(&cli.profile_name)?;

    if cli.json {
        output_json(&serde_json::json!({
            "ok": true,
            "created": cli.profile_name,
        }));
    } else if !cli.quiet {
        println!(
            "Saved current settings as {} profile '{}'",
            manager.handle().model_display(),
            style(&cli.profile_name).green()
        );
    }
    Ok(())
}

fn cmd_update(cli: &Cli, manager: &mut Manager) -> Result<()> {
    manager.update(&cli.profile_name)?;

    if cli.json {
        output_json(&serde_json::json!({
            "ok": true,
            "updated": cli.profile_name,
        }));
    } else if !cli.quiet {
        println!(
            "Updated {} profile '{}' with the current settings",
            manager.handle().model_display(),
            style(&cli.profile_name).green()
        );
    }
    Ok(())
}

fn cmd_show(cli: &Cli, manager: &Manager, gateway: &dyn CommandGateway) -> Result<()> {
    let profile = manager.show(&cli.profile_name)?;
    // The 'long form' name of the mouse for display, i.e.
    // 'Logitech G403 Prodigy Gaming Mouse' instead of 'g403'.
    let full_name = manager.handle().full_name(gateway)?;

    if cli.json {
        output_json(&ShowReport {
            device: full_name,
            alias: manager.handle().alias.clone(),
            profile,
        });
        return Ok(());
    }

    println!("{} aka '{}'", style(&full_name).bold(), manager.handle().alias);
    render_profile(profile);
    Ok(())
}

#[derive(Serialize)]
struct ShowReport<'a> {
    device: String,
    alias: String,
    profile: &'a Profile,
}

/// Display profile data similar to the output of `ratbagctl <alias> info`.
fn render_profile(profile: &Profile) {
    println!("Profile: {}", style(&profile.name).bold());
    println!("  Polling rate: {} Hz", profile.snapshot.report_rate);

    println!("  Resolutions:");
    for (idx, dpi) in profile.snapshot.resolutions.iter().enumerate() {
        // Inactive slots stay hidden.
        if *dpi == 0 {
            continue;
        }
        let mut line = format!("    {idx}: {dpi} dpi");
        if idx == profile.snapshot.default_resolution {
            line.push_str(" (default)");
        }
        println!("{line}");
    }

    println!("  Buttons:");
    for (idx, button) in profile.snapshot.buttons.iter().enumerate() {
        if apply::is_macro_token(button) {
            println!("    button {idx}: macro {button}");
        } else {
            println!("    button {idx}: {button}");
        }
    }

    println!("  LEDs:");
    for (idx, led) in profile.snapshot.leds.iter().enumerate() {
        println!("    led {idx}:");
        println!("      mode: {}", led.mode);
        if let Some(color) = &led.color {
            match colorname::color_name(color) {
                Some(name) => println!("      color: {color} '{name}'"),
                None => println!("      color: {color}"),
            }
        }
        if let Some(duration) = led.duration {
            println!("      duration: {duration}");
        }
        if led.brightness == 255 {
            println!("      brightness: {} (max)", led.brightness);
        } else {
            println!("      brightness: {}", led.brightness);
        }
    }
}

// === Output Helpers ===

fn print_no_intent(cli: &Cli) {
    if cli.json {
        output_json(&serde_json::json!({
            "ok": false,
            "error": "no_flag_set",
            "message": "No flag(s) set",
        }));
    } else {
        println!("No flag(s) set");
        print_help_pointer();
    }
}

fn print_help_pointer() {
    println!("See '{}' for help", style("gmpm --help").yellow());
}

fn output_json<T: Serialize>(data: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
    );
}

fn output_error(cli: &Cli, error: &GmpmError) {
    if cli.json {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
