//! Command-line front end. Each subcommand drives one flow and prints what
//! the browser client would have shown on screen.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::flows::dialogs::{DirectorDialog, GenreDialog, MovieDetailsDialog};
use crate::flows::login::LoginForm;
use crate::flows::movies::MovieList;
use crate::flows::profile::Profile;
use crate::flows::registration::RegistrationForm;
use crate::flows::{FlowContext, FlowError};
use crate::models::{Credentials, NewUser, User, UserUpdate};

#[derive(Parser, Debug)]
#[command(name = "myflix", author, version, about = "Browse the myFlix movie catalog")]
pub struct Cli {
    /// Base URL of the movie service (overrides MYFLIX_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides MYFLIX_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: String,
        /// Birthday as YYYY-MM-DD
        #[arg(long)]
        birthday: Option<NaiveDate>,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "MYFLIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List every movie, marking favorites
    Movies,
    /// Show one movie
    Movie { title: String },
    /// Show a director
    Director { name: String },
    /// Show a genre
    Genre { name: String },
    /// Change the favorites list
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// List registered users
    Users,
    /// Manage the logged-in account
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum FavoriteAction {
    /// Add the movie if absent, remove it if present
    Toggle { movie_id: String },
    /// Add the movie through the favorites endpoint
    Add { movie_id: String },
    /// Remove the movie through the favorites endpoint
    Remove { movie_id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    Edit {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        birthday: Option<NaiveDate>,
    },
    Delete,
}

pub async fn run(command: Command, ctx: FlowContext) -> Result<(), FlowError> {
    match command {
        Command::Register {
            username,
            password,
            email,
            birthday,
        } => {
            let details = NewUser {
                username,
                password,
                email,
                birthday,
            };
            RegistrationForm::new(ctx, details).submit().await
        }
        Command::Login { username, password } => {
            let mut form = LoginForm::new(ctx, Credentials { username, password });
            let result = form.submit().await;
            debug!("Login form {:?}, open: {}", form.state(), form.is_open());
            let user = result?;
            println!("Welcome, {}!", user.username);
            Ok(())
        }
        Command::Logout => Profile::new(ctx).logout(),
        Command::Movies => {
            let mut list = MovieList::new(ctx.clone());
            list.activate().await?;
            for movie in list.movies() {
                let favorite = lookup(&ctx, list.is_favorite(&movie.id))?;
                let mark = if favorite { "♥" } else { " " };
                println!(
                    "{} {:<26} {} ({}, {})",
                    mark, movie.id, movie.title, movie.genre.name, movie.director.name
                );
            }
            Ok(())
        }
        Command::Movie { title } => {
            let movie = lookup(&ctx, MovieList::new(ctx.clone()).movie(&title).await)?;
            print!("{}", MovieDetailsDialog(&movie));
            Ok(())
        }
        Command::Director { name } => {
            let director = lookup(&ctx, MovieList::new(ctx.clone()).director(&name).await)?;
            print!("{}", DirectorDialog(&director));
            Ok(())
        }
        Command::Genre { name } => {
            let genre = lookup(&ctx, MovieList::new(ctx.clone()).genre(&name).await)?;
            print!("{}", GenreDialog(&genre));
            Ok(())
        }
        Command::Favorite { action } => {
            let list = MovieList::new(ctx);
            match action {
                FavoriteAction::Toggle { movie_id } => list.toggle_favorite(&movie_id).await,
                FavoriteAction::Add { movie_id } => list.add_favorite(&movie_id).await,
                FavoriteAction::Remove { movie_id } => list.remove_favorite(&movie_id).await,
            }
            .map(|_| ())
        }
        Command::Users => {
            let users = lookup(&ctx, Profile::new(ctx.clone()).list_users().await)?;
            for user in &users {
                println!("{}", user.username);
            }
            Ok(())
        }
        Command::Profile { action } => {
            let profile = Profile::new(ctx);
            match action {
                ProfileAction::Show => {
                    print_user(&profile.show().await?);
                    Ok(())
                }
                ProfileAction::Edit {
                    username,
                    password,
                    email,
                    birthday,
                } => {
                    let changes = UserUpdate {
                        username,
                        password,
                        email,
                        birthday,
                        favorite_movies: None,
                    };
                    if changes.is_empty() {
                        println!("Nothing to change");
                        return Ok(());
                    }
                    print_user(&profile.edit(changes).await?);
                    Ok(())
                }
                ProfileAction::Delete => profile.delete().await,
            }
        }
    }
}

/// Report a failed read-only lookup the same way the other flows do
fn lookup<T>(ctx: &FlowContext, result: Result<T, FlowError>) -> Result<T, FlowError> {
    if let Err(e) = &result {
        ctx.failure(format!("Could not load details: {}", e));
    }
    result
}

fn print_user(user: &User) {
    println!("Username:  {}", user.username);
    println!("Email:     {}", user.email);
    if let Some(birthday) = user.birthday {
        println!("Birthday:  {}", birthday.format("%Y-%m-%d"));
    }
    println!("Favorites: {}", user.favorite_movies.join(", "));
}
