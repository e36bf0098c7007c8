use std::path::PathBuf;

use clap::{Parser, Subcommand};

use skk_cli::commands::{config_ops, convert_ops, dict_ops, settings_or_default, user_dict_ops};
use skk_core::encoding::TextEncoding;
use skk_core::settings::expand_home;

#[derive(Parser)]
#[command(name = "skktool", about = "SKK dictionary and conversion tool")]
struct Cli {
    /// Settings TOML (default: built-in settings)
    #[arg(long, global = true)]
    config: Option<String>,
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a headword (`おくr` style headwords search okuri-ari)
    Lookup {
        /// Headword
        word: String,
        /// Dictionary file to search instead of the configured sources
        #[arg(long = "dict")]
        dicts: Vec<String>,
        /// Encoding of --dict files
        #[arg(long, default_value = "auto")]
        encoding: TextEncoding,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List completions for a headword prefix
    Complete {
        /// Kana prefix
        prefix: String,
        /// Unconverted romaji after the prefix
        #[arg(long, default_value = "")]
        feed: String,
        /// Dictionary file to search instead of the configured sources
        #[arg(long = "dict")]
        dicts: Vec<String>,
        /// Encoding of --dict files
        #[arg(long, default_value = "auto")]
        encoding: TextEncoding,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Query a dictionary server (skkserv protocol)
    ServerLookup {
        /// Headword, or prefix with --prefix
        word: String,
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value = "1178")]
        port: u16,
        /// Request and response encoding
        #[arg(long, default_value = "euc-jp")]
        encoding: TextEncoding,
        /// List headwords starting with WORD
        #[arg(long)]
        prefix: bool,
    },
    /// Run a key sequence through the engine (`<space>`, `<c-j>`, ... notation)
    Convert {
        /// Keys to type
        keys: String,
        /// Word to register when a lookup runs out of candidates
        #[arg(long)]
        register: Option<String>,
        /// Answer yes to purge confirmations
        #[arg(long)]
        yes: bool,
        /// Save the user dictionary afterwards
        #[arg(long)]
        save: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the default kana table as TOML
    KanaExport,
    /// Validate a kana table (TOML, or line-based for other extensions)
    KanaValidate {
        /// Path to the table file
        file: String,
        /// Encoding of line-based tables
        #[arg(long, default_value = "auto")]
        encoding: TextEncoding,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Manage the user dictionary
    UserDict {
        /// User dictionary file (default: from settings)
        #[arg(long)]
        file: Option<String>,
        #[command(subcommand)]
        action: UserDictAction,
    },
}

#[derive(Subcommand)]
enum UserDictAction {
    /// Add a candidate at the front of a headword
    Add {
        /// Headword (`おくr` for okuri-ari)
        word: String,
        /// Candidate
        candidate: String,
    },
    /// Remove a candidate
    Remove {
        /// Headword
        word: String,
        /// Candidate
        candidate: String,
    },
    /// List all entries
    List,
}

fn main() {
    let cli = Cli::parse();
    skk_cli::init_logging(cli.verbose);
    let settings = settings_or_default(cli.config.as_deref());

    match cli.command {
        Command::Lookup {
            word,
            dicts,
            encoding,
            json,
        } => {
            let store = dict_ops::open_store(&settings, &dicts, encoding);
            dict_ops::lookup(&store, &word, json);
        }
        Command::Complete {
            prefix,
            feed,
            dicts,
            encoding,
            json,
        } => {
            let store = dict_ops::open_store(&settings, &dicts, encoding);
            dict_ops::complete(&store, &settings, &prefix, &feed, json);
        }
        Command::ServerLookup {
            word,
            host,
            port,
            encoding,
            prefix,
        } => {
            let args = dict_ops::ServerArgs {
                host: &host,
                port,
                encoding,
            };
            dict_ops::server_lookup(&args, &word, prefix);
        }
        Command::Convert {
            keys,
            register,
            yes,
            save,
            json,
        } => {
            let opts = convert_ops::ConvertOptions {
                word: register.as_deref(),
                confirm: yes,
                save,
                json,
                verbose: cli.verbose,
            };
            convert_ops::convert_cmd(settings, &keys, &opts);
        }
        Command::KanaExport => config_ops::kana_export(),
        Command::KanaValidate { file, encoding } => config_ops::kana_validate(&file, encoding),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::UserDict { file, action } => {
            let path: PathBuf = match file {
                Some(f) => expand_home(&f),
                None => settings.dictionary.user_dictionary_path().unwrap_or_else(|| {
                    eprintln!("Error: no user dictionary configured (use --file)");
                    std::process::exit(1);
                }),
            };
            let encoding = settings.dictionary.user_dictionary_encoding;
            match action {
                UserDictAction::Add { word, candidate } => {
                    user_dict_ops::user_dict_add(&path, encoding, &word, &candidate)
                }
                UserDictAction::Remove { word, candidate } => {
                    user_dict_ops::user_dict_remove(&path, encoding, &word, &candidate)
                }
                UserDictAction::List => user_dict_ops::user_dict_list(&path, encoding),
            }
        }
    }
}
