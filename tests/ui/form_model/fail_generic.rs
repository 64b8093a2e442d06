#![allow(dead_code)]

#[derive(leadform::form::FormModel)]
struct Draft<T> {
    name: T,
}

fn main() {}
