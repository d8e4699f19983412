mod command;
mod protocol;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
