use cucumber::{cli, World};
use cucumber_tests::features::QuireWorld;

#[tokio::main]
async fn main() {
    QuireWorld::cucumber()
        .with_cli::<()>(cli::Opts::parsed())
        .run_and_exit("features/")
        .await;
}
