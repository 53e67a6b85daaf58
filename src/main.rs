use clap::Parser;
use codecart::cli::{
    handle_add, handle_delete, handle_edit, handle_get, handle_init, handle_list, handle_lock,
    handle_status, handle_unlock, init_logging, Cli, Commands,
};

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { passcode } => handle_init(passcode),
        Commands::Unlock { passcode } => handle_unlock(passcode),
        Commands::Lock => handle_lock(),
        Commands::List { status, json } => handle_list(status, json),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Add(args) => handle_add(args),
        Commands::Edit(args) => handle_edit(args),
        Commands::Delete { id, force } => handle_delete(id, force),
        Commands::Status { date } => handle_status(date),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
