use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Uniprot(commands::uniprot::Commands),
}

#[derive(Parser)]
#[command(
    name = "uniprot-ru",
    color = clap::ColorChoice::Always,
    author = "Biology CLI",
    version = "0.1.0",
    about = "Import the UniProt knowledgebase into SQLite and query it",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "uniprot-ru",
            "import",
            "uniprot_sprot.xml",
            "reldate.txt",
            "--taxids",
            "9606,10090",
            "--batch-size",
            "100",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Uniprot(commands::uniprot::Commands::Import(_))
        ));
    }

    #[test]
    fn test_parse_query_rejects_unknown_entity() {
        assert!(Cli::try_parse_from(["uniprot-ru", "query", "protein"]).is_err());
        assert!(Cli::try_parse_from(["uniprot-ru", "query", "keyword", "-e", "name=Behavior"]).is_ok());
    }

    #[test]
    fn test_page_arguments_require_each_other() {
        assert!(Cli::try_parse_from(["uniprot-ru", "query", "accession", "--page-size", "10"]).is_err());
        assert!(Cli::try_parse_from(["uniprot-ru", "query", "accession", "--page", "2"]).is_err());
        assert!(Cli::try_parse_from(["uniprot-ru", "query", "accession", "--page", "2", "--page-size", "10"]).is_ok());
    }

    #[test]
    fn test_arguments_are_documented() {
        let mut command = Cli::command();
        let query = command.find_subcommand_mut("query").unwrap();
        let help = query.render_help().to_string();
        assert!(help.contains("SQL LIKE syntax"));
        assert!(help.contains("Rows per page"));
    }
}
