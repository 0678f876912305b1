
mod checkpoint_resume;
mod question_generation;
mod routing;
