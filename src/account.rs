use std::path::Path;

/// Accounts whose exports can be told apart by file name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Account {
    Amex,
    Mastercard,
    Nordea,
    Unknown,
}

/// File name prefix of each account's exports.
const FILE_PREFIXES: &[(&str, Account)] = &[
    ("activity", Account::Amex),
    ("Transaktioner_", Account::Mastercard),
    ("PERSONKONTO", Account::Nordea),
];

impl Account {
    pub fn from_file_name(file_name: &str) -> Self {
        FILE_PREFIXES
            .iter()
            .find(|(prefix, _)| file_name.starts_with(prefix))
            .map_or(Account::Unknown, |(_, account)| *account)
    }

    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .and_then(|name| name.to_str())
            .map_or(Account::Unknown, Self::from_file_name)
    }

    /// The label used to name the converted file. Empty for unrecognized
    /// exports.
    pub fn label(&self) -> &'static str {
        use Account::*;
        match self {
            Amex => "Amex",
            Mastercard => "Mastercard",
            Nordea => "Nordea",
            Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case("activity.csv" => Account::Amex; "amex")]
    #[test_case("activity (1).csv" => Account::Amex; "amex_duplicate_download")]
    #[test_case("Transaktioner_2023-08-01.csv" => Account::Mastercard; "mastercard")]
    #[test_case("PERSONKONTO 1234 56 78901 - 2023-08-01.csv" => Account::Nordea; "nordea")]
    #[test_case("transaktioner_2023.csv" => Account::Unknown; "prefix_is_case_sensitive")]
    #[test_case("export1-Amex.csv" => Account::Unknown; "unrecognized")]
    fn test_from_file_name(name: &str) -> Account {
        Account::from_file_name(name)
    }

    #[test]
    fn test_from_path_uses_file_name_only() {
        assert_eq!(
            Account::Nordea,
            Account::from_path(Path::new("/tmp/activity/PERSONKONTO.csv"))
        );
    }

    #[test]
    fn test_unknown_label_is_empty() {
        assert_eq!("", Account::Unknown.label());
        assert_eq!("Mastercard", Account::Mastercard.label());
    }
}
