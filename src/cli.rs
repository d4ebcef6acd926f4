use std::env;
use std::io;
use std::path::PathBuf;

use clap::{App, Arg, ArgMatches};

static VERSION: &str = "0.1.0";
static DESCRIPTION: &str = "Downloads every photo album of a bebo account";
pub(crate) const USERNAME: &str = "username";
const USERNAME_SHORT: &str = "u";
pub(crate) const OUTDIR: &str = "outdir";
const OUTDIR_SHORT: &str = "o";

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("bebo-dl")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(Arg::with_name(USERNAME)
            .short(USERNAME_SHORT)
            .long(USERNAME)
            .value_name("USERNAME")
            .takes_value(true)
            .help("Bebo username, prompted for when missing"))
        .arg(Arg::with_name(OUTDIR)
            .short(OUTDIR_SHORT)
            .long(OUTDIR)
            .value_name("DIR")
            .takes_value(true)
            .help("Download directory for albums (defaults to the current directory)"))
}

pub(crate) fn build_cli<'a>() -> ArgMatches<'a> {
    app().get_matches()
}

pub(crate) struct DownloadCmd {
    pub(crate) username: Option<String>,
    pub(crate) outdir: PathBuf,
}

impl DownloadCmd {
    pub(crate) fn build(matches: &ArgMatches) -> io::Result<Self> {
        let username = matches.value_of(USERNAME).map(str::to_owned);
        let outdir = match matches.value_of(OUTDIR) {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?,
        };

        Ok(DownloadCmd { username, outdir })
    }
}
