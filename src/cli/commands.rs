use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "codecart")]
#[command(version, about = "Track code carts and P-bags and their expiration dates")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new tracker in the current directory
    Init {
        /// Passcode required by 'codecart unlock'
        #[arg(long)]
        passcode: Option<String>,
    },

    /// Unlock the tracker for this shell session
    Unlock {
        /// Passcode (read from stdin when omitted)
        #[arg(long)]
        passcode: Option<String>,
    },

    /// Lock the tracker for this shell session
    Lock,

    /// List all code carts and P-bags, newest first
    List {
        /// Only show items whose most pressing date has this status
        /// (expired, urgent, expiring_soon, good, na)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single item
    Get {
        /// Item ID (full UUID or prefix like "a1b2c3d")
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new code cart or P-bag
    Add(AddArgs),

    /// Edit an existing item
    Edit(EditArgs),

    /// Delete an item
    Delete {
        /// Item ID (full UUID or prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show the expiration status of a date (YYYY-MM-DD)
    Status {
        date: String,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Cart or bag label, e.g. "CC-12"
    pub identifier: String,

    /// Item type (code-cart, p-bag)
    #[arg(long = "type", short = 't', default_value = "code-cart")]
    pub cart_type: String,

    /// Where the item is kept
    #[arg(long, short = 'l')]
    pub location: String,

    /// Initials of the employee who checked the item
    #[arg(long, short = 'i')]
    pub initials: String,

    /// Earliest drug expiration date (YYYY-MM-DD)
    #[arg(long = "drug-exp")]
    pub drug_exp: Option<String>,

    /// Earliest supply expiration date (YYYY-MM-DD)
    #[arg(long = "supply-exp")]
    pub supply_exp: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Item ID (full UUID or prefix)
    pub id: String,

    /// New cart or bag label
    #[arg(long)]
    pub identifier: Option<String>,

    /// New item type (code-cart, p-bag)
    #[arg(long = "type", short = 't')]
    pub cart_type: Option<String>,

    /// New location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// New employee initials
    #[arg(long, short = 'i')]
    pub initials: Option<String>,

    /// New drug expiration date (YYYY-MM-DD)
    #[arg(long = "drug-exp", conflicts_with = "clear_drug_exp")]
    pub drug_exp: Option<String>,

    /// New supply expiration date (YYYY-MM-DD)
    #[arg(long = "supply-exp", conflicts_with = "clear_supply_exp")]
    pub supply_exp: Option<String>,

    /// Remove the drug expiration date
    #[arg(long)]
    pub clear_drug_exp: bool,

    /// Remove the supply expiration date
    #[arg(long)]
    pub clear_supply_exp: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
