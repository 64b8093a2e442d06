#![allow(dead_code)]

#[derive(leadform::form::FormModel)]
struct Pair(String, String);

fn main() {}
