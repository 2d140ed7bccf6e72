use anyhow::Result;

use crate::objects::read_object;
use crate::repo::Repository;

pub fn cat_file_command(
    _pretty_print: bool,
    show_type: bool,
    show_size: bool,
    object_hash: &str,
) -> Result<()> {
    let repo = Repository::open()?;
    let (kind, payload) = read_object(&repo.objects_dir(), object_hash)?;

    if show_type {
        println!("{}", kind);
    } else if show_size {
        println!("{}", payload.len());
    } else {
        print!("{}", String::from_utf8_lossy(&payload));
    }

    Ok(())
}
