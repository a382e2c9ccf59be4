use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::exit,
};

use anyhow::{anyhow, Error};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use mp4_dl::{
    server,
    status::{done, fail},
    Downloader, Extraction, PageResolver,
};

fn is_number(test: String) -> Result<(), String> {
    test.parse::<u32>().map_err(|err| err.to_string())?;
    Ok(())
}

fn is_port(test: String) -> Result<(), String> {
    test.parse::<u16>().map_err(|err| err.to_string())?;
    Ok(())
}

fn is_range(test: String) -> Result<(), String> {
    let split: Vec<String> = test.split(",").map(|s| s.to_owned()).collect();
    if split.len() > 2 {
        Err(String::from("More than 2 numbers were entered"))?
    }
    for range in split {
        is_number(range.to_owned())?;
        if range == "0" {
            Err(String::from("Entries start at 1"))?
        }
    }
    Ok(())
}

/// Turns `N` or `N,M` (1-based, inclusive) into indices into `len` candidates.
fn parse_entries(range: Option<&str>, len: usize) -> Result<Vec<usize>, Error> {
    let bounds = match range {
        Some(range) => range
            .split(",")
            .map(|n| n.trim().parse::<usize>())
            .collect::<Result<Vec<usize>, _>>()?,
        None => vec![1],
    };
    let first = *bounds.first().ok_or(anyhow!("Empty entry range"))?;
    let last = *bounds.last().ok_or(anyhow!("Empty entry range"))?;
    if first == 0 || first > last {
        Err(anyhow!("Invalid entry range {}-{}", first, last))?
    }
    if last > len {
        Err(anyhow!(
            "Entry {} requested but only {} link(s) were found",
            last,
            len
        ))?
    }
    Ok((first - 1..last).collect())
}

#[tokio::main]
pub async fn main() -> Result<(), Error> {
    let url_arg = Arg::with_name("url")
        .required(true)
        .value_name("URL")
        .help("Page that embeds the video.");
    let matches = App::new("mp4-dl")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("extract")
                .about("Lists the mp4 links found on a page.")
                .arg(url_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("download")
                .about("Downloads mp4 links found on a page.")
                .arg(url_arg)
                .arg(
                    Arg::with_name("entries")
                        .long("entries")
                        .short("e")
                        .takes_value(true)
                        .validator(is_range)
                        .value_name("RANGE")
                        .help("Downloads links by a given range, i.e. 2,5 will download links 2 through 5. Defaults to the first link."),
                )
                .arg(
                    Arg::with_name("out")
                        .long("out")
                        .short("o")
                        .takes_value(true)
                        .default_value(".")
                        .value_name("DIRECTORY")
                        .help("Saves the videos to the specified path."),
                )
                .arg(
                    Arg::with_name("parallel")
                        .long("parallel")
                        .help("Downloads the selected links simultaneously."),
                ),
        )
        .subcommand(
            SubCommand::with_name("serve")
                .about("Serves a web form for looking up mp4 links.")
                .arg(
                    Arg::with_name("host")
                        .long("host")
                        .takes_value(true)
                        .default_value("127.0.0.1")
                        .value_name("HOST")
                        .help("Address to listen on."),
                )
                .arg(
                    Arg::with_name("port")
                        .long("port")
                        .short("p")
                        .takes_value(true)
                        .default_value("3000")
                        .value_name("PORT")
                        .validator(is_port)
                        .help("Port to listen on."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("extract", Some(sub)) => {
            let extraction = resolve_or_exit(sub).await;
            list(&extraction);
        }
        ("download", Some(sub)) => {
            let extraction = resolve_or_exit(sub).await;
            download(sub, extraction).await?;
        }
        ("serve", Some(sub)) => {
            let host: IpAddr = sub
                .value_of("host")
                .ok_or(anyhow!("Missing host"))?
                .parse()?;
            let port: u16 = sub.value_of("port").ok_or(anyhow!("Missing port"))?.parse()?;
            server::serve(SocketAddr::new(host, port), PageResolver::new()).await;
        }
        _ => unreachable!(),
    }
    Ok(())
}

async fn resolve_or_exit(matches: &ArgMatches<'_>) -> Extraction {
    let url = matches.value_of("url").unwrap_or_default();
    match PageResolver::new().resolve(url).await {
        Ok(extraction) => extraction,
        Err(_) => exit(1),
    }
}

fn list(extraction: &Extraction) {
    if extraction.identifier.is_empty() {
        fail("No video id could be derived from the URL.");
    } else {
        done(format!("Video ID: {}", extraction.identifier).as_str());
    }
    for (i, url) in extraction.candidates.iter().enumerate() {
        println!("{:>3}. {}", i + 1, url);
    }
}

async fn download(matches: &ArgMatches<'_>, extraction: Extraction) -> Result<(), Error> {
    list(&extraction);
    if extraction.candidates.is_empty() {
        fail("Nothing to download.");
        return Ok(());
    }
    let entries = parse_entries(matches.value_of("entries"), extraction.candidates.len())?;
    let out = PathBuf::from(matches.value_of("out").unwrap_or("."));
    tokio::fs::create_dir_all(&out).await?;
    let downloader = Downloader::new();
    if matches.is_present("parallel") {
        let mut handels = Vec::new();
        for index in entries {
            let downloader = downloader.clone();
            let url = extraction.candidates[index].clone();
            let identifier = extraction.identifier.clone();
            let out = out.clone();
            handels.push(tokio::task::spawn(async move {
                if let Err(err) = downloader.download(&url, &identifier, &out).await {
                    fail(err.to_string().as_str());
                }
            }));
        }
        for handle in handels {
            handle.await?;
        }
    } else {
        for index in entries {
            if let Err(err) = downloader
                .download(&extraction.candidates[index], &extraction.identifier, &out)
                .await
            {
                fail(err.to_string().as_str());
            }
        }
    }
    Ok(())
}
