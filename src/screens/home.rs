use std::io::Write;

use anyhow::Result;

use crate::{
    app::Input,
    routes::{Route, Transition},
};

fn render<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "ATU Campus Parking Tool")?;
    writeln!(out, "ATU Parking made easy")?;
    writeln!(out)?;
    writeln!(out, "  [1] Get Started")?;
    writeln!(out, "  [2] View Parking Map")?;
    writeln!(out, "  [q] Quit")?;
    out.flush()?;
    Ok(())
}

pub async fn show<W: Write>(input: &mut Input, out: &mut W) -> Result<Transition> {
    render(out)?;
    while let Some(line) = input.recv().await {
        match line.trim() {
            "" => continue,
            "1" | "start" | "map" => return Ok(Transition::Push(Route::Map)),
            "2" | "pdf" | "parkingmap" => return Ok(Transition::Push(Route::ParkingMap)),
            "back" | "b" => return Ok(Transition::Back),
            "q" | "quit" => return Ok(Transition::Exit),
            other => {
                writeln!(out, "Unknown option: {} (choose 1, 2 or q)", other)?;
                out.flush()?;
            }
        }
    }
    Ok(Transition::Exit)
}
