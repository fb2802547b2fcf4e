//! Read-only detail views. Each dialog renders the record it was opened with
//! and nothing else.

use std::fmt;

use crate::models::{Director, Genre, Movie};

pub struct DirectorDialog<'a>(pub &'a Director);

pub struct GenreDialog<'a>(pub &'a Genre);

pub struct MovieDetailsDialog<'a>(pub &'a Movie);

impl fmt::Display for DirectorDialog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let director = self.0;
        writeln!(f, "🎬 {}", director.name)?;
        match (&director.birth, &director.death) {
            (Some(birth), Some(death)) => writeln!(f, "   {} – {}", birth, death)?,
            (Some(birth), None) => writeln!(f, "   Born {}", birth)?,
            (None, Some(death)) => writeln!(f, "   Died {}", death)?,
            (None, None) => {}
        }
        if !director.bio.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", director.bio)?;
        }
        Ok(())
    }
}

impl fmt::Display for GenreDialog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🏷️  {}", self.0.name)?;
        if !self.0.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.0.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for MovieDetailsDialog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let movie = self.0;
        writeln!(f, "🎞️  {}{}", movie.title, if movie.featured { " ⭐" } else { "" })?;
        writeln!(f, "   Genre:    {}", movie.genre.name)?;
        writeln!(f, "   Director: {}", movie.director.name)?;
        if let Some(image) = &movie.image_path {
            writeln!(f, "   Image:    {}", image)?;
        }
        if !movie.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", movie.description)?;
        }
        Ok(())
    }
}
