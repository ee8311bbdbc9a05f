use clap::{Parser, Subcommand};

/// Command-line interface definition for boredit
/// Multi-user borehole stratigraphy editing on SQLite
#[derive(Parser)]
#[command(
    name = "boredit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Borehole stratigraphy editing: edit locks, approval workflow and layer depth repair on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Acting user (already authenticated upstream)
    #[arg(global = true, long = "user", short = 'u')]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a user account
    UserAdd {
        username: String,

        #[arg(long = "admin", help = "Grant administrative rights")]
        admin: bool,
    },

    /// Create a workgroup
    GroupAdd { name: String },

    /// Set the roles of a user in a workgroup
    Member {
        username: String,

        group: String,

        /// Comma-separated roles: VIEW,EDIT,CONTROL,VALID,PUBLIC
        #[arg(long = "roles", default_value = "")]
        roles: String,

        #[arg(long = "disabled", help = "Membership is read-only")]
        disabled: bool,
    },

    /// Borehole records
    Borehole {
        #[command(subcommand)]
        action: BoreholeAction,
    },

    /// Acquire the edit lock of a borehole
    Lock { borehole: i64 },

    /// Release the edit lock of a borehole
    Unlock { borehole: i64 },

    /// Approval workflow transitions
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// Stratigraphy profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Layers of a profile
    Layer {
        #[command(subcommand)]
        action: LayerAction,
    },

    /// Advisory consistency report of a profile
    Validate {
        profile: i64,

        #[arg(long = "json", help = "Print layers and report as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum BoreholeAction {
    /// Create a borehole together with its first workflow entry
    Add {
        name: String,

        #[arg(long = "group", help = "Owning workgroup name")]
        group: String,

        #[arg(long = "role", default_value = "EDIT", help = "Initial workflow role")]
        role: String,

        #[arg(long = "finished", help = "Create the first stage already finished (imports)")]
        finished: bool,
    },

    /// List boreholes visible to the user
    List {
        /// Ignore memberships granting only these roles (comma-separated)
        #[arg(long = "exclude", default_value = "")]
        exclude: String,
    },

    /// Show one borehole with its workflow
    Show { id: i64 },

    /// Set one attribute (name, total_depth, top_bedrock, lithology, lithostratigraphy)
    Set { id: i64, field: String, value: String },
}

#[derive(Subcommand)]
pub enum WorkflowAction {
    /// Start the workflow of a borehole that has none
    Start {
        borehole: i64,

        #[arg(long = "role", default_value = "EDIT")]
        role: String,

        #[arg(long = "finished")]
        finished: bool,
    },

    /// Close the last stage and advance to the next role
    Submit { entry: i64 },

    /// Close the last stage and step back one role
    Reject { entry: i64 },

    /// Admin: open an arbitrary role after the last entry
    Reset { entry: i64, role: String },

    /// Print the stage log of a borehole
    History { borehole: i64 },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Add a profile (geology, geotechnical, casing, instrument, filling)
    Add {
        borehole: i64,

        #[arg(long = "kind", default_value = "geology")]
        kind: String,

        #[arg(long = "name")]
        name: Option<String>,
    },

    /// Make a geology profile the primary one
    Primary { profile: i64 },

    /// Delete a profile and its layers
    Del { profile: i64 },

    /// List the profiles of a borehole
    List { borehole: i64 },
}

#[derive(Subcommand)]
pub enum LayerAction {
    /// Append a layer at the next free depth
    Add { profile: i64 },

    /// Delete a layer: 0=only, 1=extend upper, 2=extend lower, 3=split at --value
    Del {
        layer: i64,

        #[arg(long = "mode", default_value_t = 0)]
        mode: u8,

        #[arg(long = "value")]
        value: Option<f64>,
    },

    /// Close the gap above a layer: 0=fill, 1=extend upper, 2=extend self, 3=split at --value
    Gap {
        layer: i64,

        #[arg(long = "mode", default_value_t = 0)]
        mode: u8,

        #[arg(long = "value")]
        value: Option<f64>,
    },

    /// Set one attribute of a layer ("null" clears it)
    Set {
        layer: i64,
        field: String,
        value: String,
    },

    /// List the layers of a profile in depth order
    List { profile: i64 },
}
