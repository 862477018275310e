use serde::Serialize;

use crate::model::*;
use crate::registry::RegistryError;
use crate::session::{Rendered, Session};
use crate::source::ProgrammeSource;
use crate::view::{ViewAction, ViewState};

/// One line of driver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Tracks,
    Calendar(bool),
    Schedule(bool),
    Eligible(bool),
    Track(Option<TrackId>),
    Subscribe(ActivityId),
    Unsubscribe(ActivityId),
    Status(ActivityId),
    Refresh,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CommandError::Empty);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(CommandError::Unexpected(extra.to_string()));
    }

    match verb.to_ascii_lowercase().as_str() {
        "show" => no_arg(Command::Show, arg),
        "tracks" => no_arg(Command::Tracks, arg),
        "refresh" => no_arg(Command::Refresh, arg),
        "quit" | "exit" => no_arg(Command::Quit, arg),
        "calendar" => Ok(Command::Calendar(parse_toggle(arg)?)),
        "schedule" => Ok(Command::Schedule(parse_toggle(arg)?)),
        "eligible" => Ok(Command::Eligible(parse_toggle(arg)?)),
        "track" => match arg {
            None => Err(CommandError::MissingArgument("track id or `none`")),
            Some(t) if t.eq_ignore_ascii_case("none") => Ok(Command::Track(None)),
            Some(t) => Ok(Command::Track(Some(t.to_string()))),
        },
        "subscribe" => Ok(Command::Subscribe(required_id(arg)?)),
        "unsubscribe" => Ok(Command::Unsubscribe(required_id(arg)?)),
        "status" => Ok(Command::Status(required_id(arg)?)),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn no_arg(cmd: Command, arg: Option<&str>) -> Result<Command, CommandError> {
    match arg {
        Some(extra) => Err(CommandError::Unexpected(extra.to_string())),
        None => Ok(cmd),
    }
}

fn parse_toggle(arg: Option<&str>) -> Result<bool, CommandError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "aan" | "true") => Ok(true),
        Some("off" | "uit" | "false") => Ok(false),
        Some(other) => Err(CommandError::InvalidToggle(other.to_string())),
        None => Err(CommandError::MissingArgument("on or off")),
    }
}

fn required_id(arg: Option<&str>) -> Result<ActivityId, CommandError> {
    arg.map(str::to_string)
        .ok_or(CommandError::MissingArgument("activity id"))
}

/// What the driver prints back.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Programme(Rendered),
    Activity(ActivityView),
    Tracks { tracks: Vec<Track> },
    View { label: &'static str, view: ViewState },
    Bye { bye: bool },
}

/// Run one command against a session. Mutations reload the snapshot before replying, and reads
/// reload first when another session changed a shown activity.
pub async fn execute<S: ProgrammeSource + ?Sized>(
    session: &mut Session<S>,
    cmd: Command,
) -> Result<Reply, CommandError> {
    let action = match cmd {
        Command::Show => {
            session.refresh_if_stale().await?;
            return Ok(Reply::Programme(session.render()));
        }
        Command::Tracks => {
            return Ok(Reply::Tracks {
                tracks: session.programme().tracks.clone(),
            });
        }
        Command::Status(id) => {
            session.refresh_if_stale().await?;
            return session
                .status_of(&id)
                .map(Reply::Activity)
                .ok_or(CommandError::Registry(RegistryError::UnknownActivity(id)));
        }
        Command::Subscribe(id) => {
            session.subscribe(&id).await?;
            return Ok(Reply::Programme(session.render()));
        }
        Command::Unsubscribe(id) => {
            session.unsubscribe(&id).await?;
            return Ok(Reply::Programme(session.render()));
        }
        Command::Refresh => {
            session.refresh().await?;
            return Ok(Reply::Programme(session.render()));
        }
        Command::Quit => return Ok(Reply::Bye { bye: true }),
        Command::Calendar(on) => ViewAction::SetCalendarView(on),
        Command::Schedule(on) => ViewAction::SetMyScheduleOnly(on),
        Command::Eligible(on) => ViewAction::SetEligibleOnly(on),
        Command::Track(track) => {
            if let Some(id) = &track
                && !session.programme().tracks.iter().any(|t| &t.id == id)
            {
                return Err(CommandError::UnknownTrack(id.clone()));
            }
            ViewAction::SetTrackFilter(track)
        }
    };
    let view = session.dispatch(action).clone();
    Ok(Reply::View {
        label: view.label(),
        view,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Unexpected(String),
    MissingArgument(&'static str),
    InvalidToggle(String),
    UnknownTrack(TrackId),
    Registry(RegistryError),
}

impl From<RegistryError> for CommandError {
    fn from(e: RegistryError) -> Self {
        CommandError::Registry(e)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(verb) => write!(f, "unknown command: {verb}"),
            CommandError::Unexpected(arg) => write!(f, "unexpected argument: {arg}"),
            CommandError::MissingArgument(what) => write!(f, "missing argument: {what}"),
            CommandError::InvalidToggle(arg) => write!(f, "expected on or off, got {arg}"),
            CommandError::UnknownTrack(id) => write!(f, "unknown track: {id}"),
            CommandError::Registry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_toggles() {
        assert_eq!(parse_command("calendar on"), Ok(Command::Calendar(true)));
        assert_eq!(parse_command("Schedule OFF"), Ok(Command::Schedule(false)));
        assert_eq!(parse_command("eligible aan"), Ok(Command::Eligible(true)));
        assert_eq!(
            parse_command("eligible misschien"),
            Err(CommandError::InvalidToggle("misschien".into()))
        );
        assert_eq!(
            parse_command("calendar"),
            Err(CommandError::MissingArgument("on or off"))
        );
    }

    #[test]
    fn parse_track() {
        assert_eq!(parse_command("track water"), Ok(Command::Track(Some("water".into()))));
        assert_eq!(parse_command("track none"), Ok(Command::Track(None)));
    }

    #[test]
    fn parse_ids_keep_case() {
        assert_eq!(parse_command("subscribe Kano-1"), Ok(Command::Subscribe("Kano-1".into())));
        assert_eq!(parse_command("  status  B "), Ok(Command::Status("B".into())));
    }

    #[test]
    fn parse_rejects_noise() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("dance"), Err(CommandError::Unknown("dance".into())));
        assert_eq!(parse_command("show all"), Err(CommandError::Unexpected("all".into())));
        assert_eq!(
            parse_command("subscribe a b"),
            Err(CommandError::Unexpected("b".into()))
        );
        assert_eq!(
            parse_command("unsubscribe"),
            Err(CommandError::MissingArgument("activity id"))
        );
    }
}
