#![allow(dead_code)]

#[derive(leadform::form::FormModel)]
enum Stage {
    Draft,
    Sent,
}

fn main() {}
