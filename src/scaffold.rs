//! Starter schema for a new resource.

use inflector::string::pluralize::to_plural;
use inflector::string::singularize::to_singular;

const TEMPLATE: &str = r##"$schema: http://json-schema.org/draft-04/hyper-schema
id: [resource]
title: [Resource]
description: A [resource] resource.
type: object
definitions:
  id:
    description: Unique identifier of the [resource].
    example: 1
    type: integer
  name:
    description: Display name of the [resource].
    example: Ken
    type: string
  createdAt:
    description: When the [resource] was created.
    example: "2015-04-21T23:59:60Z"
    format: date-time
    type: string
  updatedAt:
    description: When the [resource] was last updated.
    example: "2015-04-21T23:59:60Z"
    format: date-time
    type: string
properties:
  id:
    $ref: "#/definitions/id"
  name:
    $ref: "#/definitions/name"
  createdAt:
    $ref: "#/definitions/createdAt"
  updatedAt:
    $ref: "#/definitions/updatedAt"
links:
  - title: List
    description: List existing [resources].
    href: /[resources]
    method: GET
    rel: instances
    targetSchema:
      type: array
      items:
        $ref: "#"
  - title: Info
    description: Info for an existing [resource].
    href: /[resources]/{id}
    method: GET
    rel: self
  - title: Create
    description: Create a new [resource].
    href: /[resources]
    method: POST
    rel: create
    schema:
      properties:
        name:
          $ref: "#/definitions/name"
      type: object
  - title: Update
    description: Update an existing [resource].
    href: /[resources]/{id}
    method: PATCH
    rel: update
    schema:
      properties:
        name:
          $ref: "#/definitions/name"
      type: object
  - title: Delete
    description: Delete an existing [resource].
    href: /[resources]/{id}
    method: DELETE
    rel: destroy
"##;

/// Render the starter schema (YAML) for `resource`.
///
/// The name is normalised to its singular form for the document id and to the
/// plural form for link paths, so `user` and `users` give the same output.
pub fn render(resource: &str) -> String {
    let singular = singularize(resource.trim());
    let plural = pluralize(&singular);
    TEMPLATE
        .replace("[resources]", &plural)
        .replace("[resource]", &singular)
        .replace("[Resource]", &capitalize(&singular))
}

/// English plural of a singular noun.
pub fn pluralize(word: &str) -> String {
    to_plural(word)
}

/// English singular of a plural noun; singular words are returned unchanged.
pub fn singularize(word: &str) -> String {
    to_singular(word)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
