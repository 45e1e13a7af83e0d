/// Example: Print the matrices a render backend would receive
///
/// Usage: cargo run --example dump_matrices -- [path/to/model.obj]

use std::env;
use std::io;
use glview_core::{obj, Command, EditMode, Mesh, Session, SessionConfig};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => obj::load_obj(path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
        None => Mesh::cube(2.0),
    };
    println!("{} triangles, bounds {:?}", mesh.triangles.len(), mesh.bounds());

    let mut session = Session::new(1, SessionConfig::default());
    session.apply(Command::SelectMode(EditMode::Rotate));
    session.apply(Command::Drag { dx: 120.0, dy: 40.0 });
    let frame = session.apply(Command::Scroll { dy: -1.0 });

    print!("{}", session.report());
    println!("MVP uniform (column-major):");
    for column in frame.mvp_gl().chunks(4) {
        println!("  {:?}", column);
    }

    Ok(())
}
