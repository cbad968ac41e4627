pub mod city_set;
pub mod matrix;
pub mod path;
