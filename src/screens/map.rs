use std::io::Write;

use anyhow::Result;
use kurbo::{Point, Vec2};

use super::split_command;
use crate::{
    app::{App, Input},
    buildings::Building,
    map::{GestureEvent, MapView, Settle, SettleKind},
    routes::{Route, Transition},
};

const LEGEND: &str = "Tap on building markers to search for available parking.";

const HELP: &str = "\
Commands:
  pinch <factor>     pinch frame (cumulative factor)
  pinch-end          release the pinch
  pan <dx> <dy>      pan frame (cumulative translation)
  pan-end            release the pan
  tap <x> <y>        tap at a view position
  select <building>  open a building's details (brown, witherspoon)
  close              close the details
  view               View Parking for the open building
  markers            list markers and where they appear
  state              show the current zoom and offset
  back | q";

fn parse_f64(arg: Option<&&str>) -> Option<f64> {
    arg.and_then(|s| s.parse::<f64>().ok())
}

fn parse_pair(args: &[&str]) -> Option<(f64, f64)> {
    Some((parse_f64(args.first())?, parse_f64(args.get(1))?))
}

fn render_intro<W: Write>(map: &MapView, out: &mut W) -> Result<()> {
    let viewport = map.viewport();
    writeln!(out, "Campus Map ({}x{})", viewport.width, viewport.height)?;
    for building in Building::ALL {
        writeln!(out, "  ● {} ({})", building, building.id())?;
    }
    writeln!(out, "Tap to explore. Type 'help' for commands.")?;
    Ok(())
}

fn render_state<W: Write>(map: &MapView, out: &mut W) -> Result<()> {
    let t = map.transform();
    writeln!(
        out,
        "zoom {:.2}x, offset ({:.1}, {:.1})",
        t.scale, t.translate.x, t.translate.y
    )?;
    Ok(())
}

fn render_settle<W: Write>(settle: &Settle, out: &mut W) -> Result<()> {
    if settle.from == settle.to {
        return Ok(());
    }
    let how = match settle.kind {
        SettleKind::Spring => "spring".to_string(),
        SettleKind::Timed(d) => format!("{}ms", d.as_millis()),
    };
    writeln!(
        out,
        "settling to ({:.1}, {:.1}) [{}]",
        settle.to.x, settle.to.y, how
    )?;
    Ok(())
}

fn render_markers<W: Write>(map: &MapView, out: &mut W) -> Result<()> {
    for building in Building::ALL {
        let p = map.marker_view_position(building);
        writeln!(out, "  {} at ({:.1}, {:.1})", building, p.x, p.y)?;
    }
    Ok(())
}

/// Detail panel for the selected building
fn render_modal<W: Write>(building: Building, out: &mut W) -> Result<()> {
    let info = building.info();
    writeln!(out, "┌ {}", info.name)?;
    writeln!(out, "│ [image: {}]", info.image)?;
    writeln!(out, "│ Location:   {}", info.location)?;
    writeln!(out, "│ Hours:      {}", info.hours)?;
    writeln!(out, "│ Department: {}", info.department)?;
    writeln!(out, "│")?;
    writeln!(out, "│ {}", info.description)?;
    writeln!(out, "└ [close] Close    [view] View Parking →")?;
    Ok(())
}

pub async fn show<W: Write>(app: &App, input: &mut Input, out: &mut W) -> Result<Transition> {
    // Remounting always starts from the untransformed map
    let mut map = MapView::new(app.config().viewport.size());
    render_intro(&map, out)?;
    out.flush()?;

    while let Some(line) = input.recv().await {
        let (verb, args) = split_command(&line);
        match verb {
            "" => continue,
            "pinch" => match parse_f64(args.first()) {
                Some(factor) => {
                    map.apply(GestureEvent::PinchUpdate { factor });
                    render_state(&map, out)?;
                }
                None => writeln!(out, "usage: pinch <factor>")?,
            },
            "pan" => match parse_pair(&args) {
                Some((dx, dy)) => {
                    map.apply(GestureEvent::PanUpdate {
                        translation: Vec2::new(dx, dy),
                    });
                    render_state(&map, out)?;
                }
                None => writeln!(out, "usage: pan <dx> <dy>")?,
            },
            "pinch-end" | "pan-end" => {
                let event = if verb == "pinch-end" {
                    GestureEvent::PinchEnd
                } else {
                    GestureEvent::PanEnd
                };
                if let Some(settle) = map.apply(event) {
                    render_settle(&settle, out)?;
                }
                render_state(&map, out)?;
            }
            "tap" => match parse_pair(&args) {
                Some((x, y)) => match map.tap(Point::new(x, y)) {
                    Some(building) => render_modal(building, out)?,
                    None => writeln!(out, "No marker there")?,
                },
                None => writeln!(out, "usage: tap <x> <y>")?,
            },
            "select" => match args.first().and_then(|id| Building::from_id(id)) {
                Some(building) => {
                    map.selection_mut().show_building_info(building);
                    render_modal(building, out)?;
                }
                None => writeln!(out, "Unknown building (try brown or witherspoon)")?,
            },
            "close" => {
                if !map.selection_mut().dismiss() {
                    writeln!(out, "Nothing to close")?;
                }
            }
            "view" => match map.selection_mut().confirm() {
                Some(path) => return Ok(Transition::Push(path.parse::<Route>()?)),
                None => writeln!(out, "Select a building first")?,
            },
            "markers" => render_markers(&map, out)?,
            "state" => render_state(&map, out)?,
            "help" | "?" => {
                writeln!(out, "{}", LEGEND)?;
                writeln!(out, "{}", HELP)?;
            }
            "back" | "b" => return Ok(Transition::Back),
            "q" | "quit" => return Ok(Transition::Exit),
            other => writeln!(out, "Unknown command: {} (type 'help')", other)?,
        }
        out.flush()?;
    }
    Ok(Transition::Exit)
}
