mod apply;
mod compose;
mod evolve;
mod show;

use assert_cmd::Command;

fn phonodrift() -> Command {
    Command::cargo_bin("phonodrift").unwrap()
}
