use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "resume-tui")]
#[command(about = "Terminal resume builder with live template preview and autosave")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive editor (default)
    Edit,

    /// Print the preview of the autosaved resume
    Preview {
        /// Template tag (template1, template2, template3); defaults to RESUME_TUI_TEMPLATE
        #[arg(short, long)]
        template: Option<String>,

        /// Print plain text lines instead of markup
        #[arg(long)]
        text: bool,
    },

    /// Print the autosaved resume as JSON
    Show,

    /// Delete the autosaved resume
    Clear,

    /// Print typeahead suggestions for a field
    Suggest {
        /// Field name, e.g. education_school
        field: String,

        /// Text typed so far
        query: String,

        /// Print the dropdown markup instead of plain candidate names
        #[arg(long)]
        html: bool,
    },

    /// List available templates
    Templates,
}
