mod facade;
mod parsing;
