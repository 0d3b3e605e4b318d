#[tokio::main]
async fn main() {
    arena_backend::run().await;
}
