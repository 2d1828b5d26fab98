use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use tabled::Table;

use crate::{
    config,
    curation::{self, BatchKind, RetryPolicy, Selected, Selection, UpdateReport},
    error,
    error::RunError,
    info,
    prompt::{self, Thresholds},
    spotify::{self, LibraryService},
    success,
    types::SelectionTableRow,
    warning,
};

/// How a run that did not fail came to an end.
#[derive(Debug)]
pub enum RunOutcome {
    /// No artist or album reached its threshold; nothing was asked.
    NothingToAdd,
    /// The user declined; the library was not touched.
    Declined,
    /// The update ran. The report tells whether every batch went through.
    Applied(UpdateReport),
}

/// Runs one curation pass for the credentials file at `config_path`.
///
/// Steps strictly forward: config, thresholds, authorization, then [`run`].
/// Invalid input and failures end the process; declining ends it without
/// touching the library.
pub async fn curate(config_path: &Path) {
    let config = match config::load(config_path) {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    println!(
        "\nHi, I'm Dewey.\nI'm here to add artists and albums to your library based on already liked tracks.\n"
    );

    let thresholds = {
        let stdin = io::stdin();
        match prompt::read_thresholds(&mut stdin.lock(), &mut io::stdout()) {
            Ok(thresholds) => thresholds,
            Err(e) => error!("Sorry, please enter numeric thresholds. {}", e),
        }
    };

    info!(
        "Thanks! I'll save artists to your library if you've liked at least {} of their tracks.",
        thresholds.artist
    );
    info!(
        "I'll save albums from which you've liked at least {} tracks.",
        thresholds.album
    );

    let mut session = match spotify::auth::authorize(&config.credentials).await {
        Ok(session) => session,
        Err(e) => error!("Cannot authorize with Spotify. Err: {}", e),
    };

    let stdin = io::stdin();
    let outcome = run(
        &mut session,
        thresholds,
        &RetryPolicy::default(),
        &mut stdin.lock(),
        &mut io::stdout(),
    )
    .await;

    match outcome {
        Ok(RunOutcome::NothingToAdd) | Ok(RunOutcome::Declined) => {}
        Ok(RunOutcome::Applied(report)) => print_report(&report),
        Err(e) => error!("{}", e),
    }
}

/// Fetches, selects, asks and updates against an already authorized `service`.
///
/// The confirmation question is only asked when something was selected, and
/// nothing is written unless the answer is yes.
///
/// # Arguments
///
/// * `service` - Authorized session, or any other [`LibraryService`]
/// * `thresholds` - Minimum saved tracks per artist and per album
/// * `policy` - Retry behaviour for the saved-tracks pages
/// * `input` - Where the confirmation answer is read from
/// * `output` - Where the confirmation question is written to
///
/// # Returns
///
/// - `Ok(RunOutcome)` - How the run ended
/// - `Err(RunError)` - The fetch failed or the answer could not be read
pub async fn run<S, R, W>(
    service: &mut S,
    thresholds: Thresholds,
    policy: &RetryPolicy,
    input: &mut R,
    output: &mut W,
) -> Result<RunOutcome, RunError>
where
    S: LibraryService,
    R: BufRead,
    W: Write,
{
    let tracks = curation::fetch_all_saved_tracks(service, policy).await?;

    let selection = curation::aggregate(&tracks, thresholds.artist, thresholds.album);
    print_selection(&selection);

    if selection.is_empty() {
        success!("Nothing to add. Bye for now.");
        return Ok(RunOutcome::NothingToAdd);
    }

    if !prompt::read_confirmation(input, output)? {
        info!("OK, quitting...");
        return Ok(RunOutcome::Declined);
    }
    info!("OK, adding...");

    let report = curation::apply(service, &selection.artist_ids(), &selection.album_ids()).await;
    Ok(RunOutcome::Applied(report))
}

fn print_selection(selection: &Selection) {
    if selection.artists.is_empty() {
        info!("No artist reached your threshold.");
    } else {
        info!(
            "Looks like you like the following artists. This is who I plan on adding to your library:"
        );
        println!("{}", selection_table(&selection.artists));
    }

    if selection.albums.is_empty() {
        info!("No album reached your threshold.");
    } else {
        info!(
            "Looks like you like the following albums. This is what I plan on adding to your library:"
        );
        println!("{}", selection_table(&selection.albums));
    }
}

fn selection_table(entries: &[Selected]) -> Table {
    let rows: Vec<SelectionTableRow> = entries
        .iter()
        .map(|s| SelectionTableRow {
            name: s.name.clone(),
            tracks: s.tracks,
        })
        .collect();
    Table::new(rows)
}

fn print_report(report: &UpdateReport) {
    let followed = report.written(BatchKind::FollowArtists);
    let saved = report.written(BatchKind::SaveAlbums);

    match report.first_failure() {
        None => success!(
            "All Done! Followed {} artists and saved {} albums. Bye for now.",
            followed,
            saved
        ),
        Some(failed) => {
            warning!(
                "{} batches went through: followed {} artists, saved {} albums.",
                report.succeeded_batches(),
                followed,
                saved
            );
            let reason = failed
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            error!(
                "Failed to {} ({} ids): {}",
                failed.kind,
                failed.ids.len(),
                reason
            );
        }
    }
}
