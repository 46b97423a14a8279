//! Config subcommand handlers.

use coverly_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Insert or replace `name`, making it the default when asked or when it
/// is the only profile.
fn upsert_profile(cfg: &mut Config, name: &str, profile: Profile, set_default: bool) {
    cfg.profiles.insert(name.to_owned(), profile);
    let default_missing = cfg
        .default_profile
        .as_ref()
        .is_none_or(|d| !cfg.profiles.contains_key(d));
    if set_default || default_missing {
        cfg.default_profile = Some(name.to_owned());
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            controller,
            name,
            no_reconnect,
            set_default,
        } => {
            let url = config::parse_url(&controller)?;
            let mut cfg = config::load_config_or_default();

            let mut profile = Profile::new(url.as_str());
            if no_reconnect {
                profile.reconnect = Some(false);
            }
            upsert_profile(&mut cfg, &name, profile, set_default);

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' written to {}", path.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
