// SPDX-License-Identifier: MPL-2.0

//! `lang-loader` command line entry point.
//!
//! Loads a locale through the same pipeline applications use and prints
//! translations, which makes it handy for checking resource files.
//!
//! ```text
//! lang-loader --list
//! lang-loader --source ./static/data/lang --locale ja-JP nav.home nav.blog
//! lang-loader --override ro-RO nav.home
//! ```

use lang_loader::config::Config;
use lang_loader::I18n;

const HELP: &str = "\
lang-loader: resolve translation keys from .lang resource files

USAGE:
  lang-loader [OPTIONS] [KEY]...

OPTIONS:
  --source <URL|DIR>   Base URL or directory holding env*.lang files
  --locale <ID>        Select this locale instead of detecting one
  --override <ID>      Look keys up in this locale without selecting it
  --list               Print the available locales
  -h, --help           Print this help
";

struct Args {
    source: Option<String>,
    locale: Option<String>,
    locale_override: Option<String>,
    list: bool,
    keys: Vec<String>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(None);
    }

    let args = Args {
        source: pargs.opt_value_from_str("--source")?,
        locale: pargs.opt_value_from_str("--locale")?,
        locale_override: pargs.opt_value_from_str("--override")?,
        list: pargs.contains("--list"),
        keys: pargs
            .finish()
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect(),
    };
    Ok(Some(args))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let mut config = Config::load();
    if let Some(source) = args.source {
        config.source = source;
    }
    log::info!("Loading resources from {}", config.source);

    let i18n = I18n::from_config(&config)?;

    if args.list {
        for locale in i18n.list_available() {
            println!("{} {:<6} {}", locale.flag, locale.code, locale.name);
        }
        return Ok(());
    }

    match args.locale {
        Some(locale) => i18n.select_locale(&locale).await?,
        None => i18n.bootstrap_from_system().await?,
    }

    if let Some(info) = i18n.current_locale_info() {
        log::info!("Active locale: {} {}", info.flag, info.name);
    }

    for key in &args.keys {
        let value = i18n.t_async(key, None, args.locale_override.as_deref()).await;
        println!("{} = {}", key, value);
    }

    Ok(())
}
