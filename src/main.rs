fn main() -> anyhow::Result<()> {
    recall_watch_lib::run()
}
