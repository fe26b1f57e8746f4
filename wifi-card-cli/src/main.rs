fn main() -> anyhow::Result<()> {
    wifi_card_cli::run()
}
