/// A chat command as typed by a member. Arguments stay raw so the
/// coordinator can report bad entries individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Suggest(String),
    List,
    Remove(Vec<String>),
    MovieInfo(Vec<String>),
    Create(Vec<String>),
    Vote(Option<String>),
    Status,
    Close,
    When,
    Help,
    Unknown(String),
}

impl Command {
    /// Parses `line` if it starts with `prefix`. Returns `None` for ordinary
    /// chatter.
    pub fn parse(prefix: &str, line: &str) -> Option<Self> {
        let body = line.trim().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();
        let args: Vec<String> = words.map(str::to_string).collect();

        let command = match name.as_str() {
            "suggest" => Self::Suggest(args.join(" ")),
            "list" => Self::List,
            "remove" => Self::Remove(args),
            "movieinfo" => Self::MovieInfo(args),
            "create" => Self::Create(args),
            "vote" => Self::Vote(args.into_iter().next()),
            "status" => Self::Status,
            "close" => Self::Close,
            "when" => Self::When,
            "help" => Self::Help,
            _ => Self::Unknown(name),
        };
        Some(command)
    }
}

pub const HELP_TEXT: &[(&str, &str, &str)] = &[
    ("suggest", "<title>", "Adds a new title to the movie list."),
    ("list", "", "Displays the movie list."),
    ("remove", "<MovieID>...", "Removes movies from the list."),
    ("movieinfo", "<MovieID>...", "Displays movie database information."),
    ("create", "<MovieID>...", "Starts a poll using MovieIDs."),
    ("vote", "<number>", "Records your movie choice."),
    ("status", "", "Displays the current poll's movies and votes."),
    ("close", "", "Ends the poll and announces the winner."),
    ("when", "", "Displays a countdown till movie night."),
    ("help", "", "Shows this message."),
];
