use std::sync::Arc;

use stockmesh_client::console::{Command, HELP, TerminalRenderer, parse_command};
use stockmesh_client::{
    ClientConfig, CycleOutcome, HttpGateway, InMemoryGateway, InventoryClient, InventoryGateway, PageStep,
    spawn_periodic_refresh,
};

type Console = InventoryClient<Arc<dyn InventoryGateway>, TerminalRenderer>;

fn main() -> anyhow::Result<()> {
    stockmesh_observability::init();

    let config = ClientConfig::from_env()?;
    let gateway: Arc<dyn InventoryGateway> = if config.is_in_memory() {
        tracing::warn!("using the in-memory inventory; nothing is persisted");
        Arc::new(InMemoryGateway::new())
    } else {
        let http = HttpGateway::new(&config)?;
        tracing::info!(api_root = http.api_root(), "starting console");
        Arc::new(http)
    };

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let client: Arc<Console> = Arc::new(InventoryClient::new(gateway, TerminalRenderer::stdio(), &config));
    let console = client.renderer();

    console.print(HELP);
    rt.block_on(client.load_list(true));

    let refresher = {
        let _enter = rt.enter();
        spawn_periodic_refresh(client.clone(), config.refresh_interval)
    };

    // Commands run one at a time on this thread. A delete's confirmation
    // prompt reads stdin from inside `block_on`.
    loop {
        console.prompt();
        let Some(line) = console.read_line() else {
            break;
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => console.print(HELP),
            Ok(Some(cmd)) => {
                if rt.block_on(dispatch(&client, cmd)) == CycleOutcome::Busy {
                    console.print("A request is still in flight; try again.");
                }
            }
            Err(e) => console.print(&e.to_string()),
        }
    }

    rt.block_on(refresher.shutdown());
    tracing::info!("console stopped");
    Ok(())
}

async fn dispatch(client: &Console, cmd: Command) -> CycleOutcome {
    match cmd {
        Command::Add(draft) => client.submit_create(&draft).await,
        Command::Search(term) => client.search(&term).await,
        Command::Refresh => client.refresh().await,
        Command::Next => client.go_to_page(PageStep::Next).await,
        Command::Prev => client.go_to_page(PageStep::Previous).await,
        Command::Delete { id, code } => client.delete_item(&id, &code).await,
        Command::Edit(id) => {
            client.edit_item(&id);
            CycleOutcome::Completed
        }
        Command::Help | Command::Quit => CycleOutcome::Completed,
    }
}
